//! Mode routing
//!
//! Unified entry points for the execution modes:
//! - Server mode (HTTP server)
//! - CLI mode (management commands)
//!
//! The mode is selected from the parsed command line; no subcommand means
//! server mode.

pub mod cli;
pub mod server;

pub use cli::run_cli;
pub use server::run_server;

use crate::cli::Commands;

/// Mode detection result
#[derive(Debug, PartialEq)]
pub enum Mode {
    Server,
    Cli,
}

/// Detect which mode to run based on the parsed subcommand
pub fn detect_mode(command: Option<&Commands>) -> Mode {
    if Commands::is_serve(command) {
        Mode::Server
    } else {
        Mode::Cli
    }
}
