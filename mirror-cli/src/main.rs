//! photo-mirror: incremental local mirror of a SmugMug photo library
//!
//! Usage:
//!   photo-mirror [--config config.json] [--output Output] [sync]
//!   photo-mirror [--config config.json] auth [--force]
//!
//! Exit codes:
//!   0   success
//!   1   any other failure
//!   2   usage or credential file problems
//!   44  the remote tree holds a node kind that cannot be mirrored

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use core_auth::AuthError;
use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
use core_sync::SyncError;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_UNSUPPORTED_NODE: u8 = 44;

#[derive(Parser, Debug)]
#[command(
    name = "photo-mirror",
    version,
    about = "Mirror a SmugMug photo library to a local directory"
)]
struct Cli {
    /// Credential file with the consumer key/secret and access token
    #[arg(
        long,
        short = 'c',
        env = "MIRROR_CONFIG",
        default_value = core_runtime::config::DEFAULT_CREDENTIALS_PATH,
        global = true
    )]
    config: PathBuf,

    /// Directory the account's tree is mirrored under
    #[arg(
        long,
        short = 'o',
        env = "MIRROR_OUTPUT",
        default_value = "Output",
        global = true
    )]
    output: PathBuf,

    /// Write every raw API response to this directory
    #[arg(long, env = "MIRROR_CAPTURE_DIR", global = true)]
    capture_dir: Option<PathBuf>,

    /// API origin
    #[arg(
        long,
        env = "MIRROR_API_ORIGIN",
        default_value = core_runtime::config::DEFAULT_API_ORIGIN,
        global = true
    )]
    api_origin: String,

    /// Log format (pretty, json, compact)
    #[arg(long, env = "MIRROR_LOG_FORMAT", global = true)]
    log_format: Option<LogFormat>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Authorize against the service and store the access token
    Auth {
        /// Run the authorization even if a token is already stored
        #[arg(long)]
        force: bool,
    },
    /// Mirror the library (default)
    Sync,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default().with_level(LogLevel::from_verbosity(cli.verbose));
    if let Some(format) = cli.log_format {
        logging = logging.with_format(format);
    }
    if let Err(e) = init_logging(logging) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(EXIT_FAILURE);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let result = runtime.block_on(async {
        match cli.command.clone().unwrap_or(Command::Sync) {
            Command::Auth { force } => commands::auth(&cli, force).await,
            Command::Sync => commands::sync(&cli).await,
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "photo-mirror failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Maps a failure onto the documented exit codes.
fn exit_code(error: &anyhow::Error) -> u8 {
    if let Some(sync) = error.downcast_ref::<SyncError>() {
        if sync.is_unsupported_node_kind() {
            return EXIT_UNSUPPORTED_NODE;
        }
    }

    match error.downcast_ref::<AuthError>() {
        Some(AuthError::CredentialsUnavailable { .. })
        | Some(AuthError::CredentialsNotSaved { .. }) => return EXIT_USAGE,
        _ => {}
    }

    if let Some(core_runtime::Error::Config(_)) = error.downcast_ref::<core_runtime::Error>() {
        return EXIT_USAGE;
    }

    EXIT_FAILURE
}
