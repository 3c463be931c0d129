//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `FileSystemAccess` using `tokio::fs`
//! - `VerifierPrompt` using the process's stdin/stdout
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ConsolePrompt, ReqwestHttpClient, TokioFileSystem};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let http_client = ReqwestHttpClient::new()?;
//!     let fs = TokioFileSystem::new();
//!     let prompt = ConsolePrompt::stdio();
//!     // Hand them to the runtime configuration
//!     Ok(())
//! }
//! ```

mod filesystem;
mod http;
mod prompt;

pub use filesystem::TokioFileSystem;
pub use http::ReqwestHttpClient;
pub use prompt::ConsolePrompt;
