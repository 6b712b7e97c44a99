//! CLI interface module
//!
//! Management commands that run directly against the database: creating
//! users, seeding the tag and ingredient catalogs, toggling short links.

pub mod commands;

use crate::cli::Commands;
use crate::services::ShortLinkService;
use crate::storage::StorageFactory;
use commands::{add_ingredient, add_tag, config_generate, create_user, set_link_active};
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::FoodgramError> for CliError {
    fn from(err: crate::errors::FoodgramError) -> Self {
        use crate::errors::FoodgramError;
        match err {
            FoodgramError::Validation(msg) | FoodgramError::Conflict(msg) => {
                CliError::CommandError(msg)
            }
            FoodgramError::NotFound(msg) => CliError::CommandError(msg),
            other => CliError::StorageError(other.to_string()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    // generate-config 不需要数据库连接
    if let Commands::GenerateConfig { output_path, force } = cmd {
        return config_generate(output_path, force).await;
    }

    let storage = StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;

    let result = match cmd {
        Commands::CreateUser {
            email,
            username,
            first_name,
            last_name,
        } => create_user(&storage, email, username, first_name, last_name).await,

        Commands::AddTag { name, slug } => add_tag(&storage, name, slug).await,

        Commands::AddIngredient { name, unit } => add_ingredient(&storage, name, unit).await,

        Commands::DeactivateLink { short_code } => {
            let links = ShortLinkService::new(storage.clone());
            set_link_active(&links, short_code, false).await
        }

        Commands::ActivateLink { short_code } => {
            let links = ShortLinkService::new(storage.clone());
            set_link_active(&links, short_code, true).await
        }

        Commands::Serve => unreachable!("serve handled in main"),
        Commands::GenerateConfig { .. } => unreachable!("handled above"),
    };

    if let Err(e) = storage.close().await {
        tracing::warn!("Failed to close database connection: {}", e);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FoodgramError;

    #[test]
    fn test_user_facing_errors_become_command_errors() {
        let err: CliError = FoodgramError::conflict("Tag slug already exists").into();
        assert!(matches!(err, CliError::CommandError(_)));

        let err: CliError = FoodgramError::database_operation("disk full").into();
        assert!(matches!(err, CliError::StorageError(_)));
    }

    #[test]
    fn test_format_simple_prefixes() {
        let err = CliError::ParseError("bad unit".to_string());
        assert_eq!(err.format_simple(), "Parse error: bad unit");
    }
}
