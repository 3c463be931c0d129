//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the photo mirror:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the CLI and the engine
//! share. It establishes the logging conventions and the validated
//! configuration object every run starts from.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
