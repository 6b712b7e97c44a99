//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for foodgram using clap's derive macros.

use clap::{Parser, Subcommand};

use crate::storage::MeasurementUnit;

/// Foodgram - recipe sharing backend
#[derive(Parser)]
#[command(name = "foodgram")]
#[command(version)]
#[command(about = "Recipe sharing backend with short links and shopping lists", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Create a user and print its API token
    CreateUser {
        email: String,
        username: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,
    },

    /// Add a recipe tag
    AddTag {
        name: String,
        /// URL slug, e.g. "breakfast"
        slug: String,
    },

    /// Add an ingredient to the catalog
    AddIngredient {
        name: String,
        /// Measurement unit (g, kg, l, ml, pcs)
        unit: MeasurementUnit,
    },

    /// Disable redirects for a short link
    DeactivateLink { short_code: String },

    /// Re-enable redirects for a short link
    ActivateLink { short_code: String },

    /// Write a sample configuration file
    GenerateConfig {
        /// Output file path (default: stdout)
        output_path: Option<String>,

        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    /// Whether this command runs the HTTP server
    pub fn is_serve(command: Option<&Commands>) -> bool {
        matches!(command, None | Some(Commands::Serve))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_means_serve() {
        let cli = Cli::try_parse_from(["foodgram"]).unwrap();
        assert!(Commands::is_serve(cli.command.as_ref()));
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_parse_add_ingredient_unit() {
        let cli =
            Cli::try_parse_from(["foodgram", "-c", "alt.toml", "add-ingredient", "flour", "g"])
                .unwrap();
        assert_eq!(cli.config, "alt.toml");
        match cli.command {
            Some(Commands::AddIngredient { name, unit }) => {
                assert_eq!(name, "flour");
                assert_eq!(unit, MeasurementUnit::G);
            }
            _ => panic!("expected add-ingredient"),
        }
    }

    #[test]
    fn test_rejects_unknown_unit() {
        assert!(Cli::try_parse_from(["foodgram", "add-ingredient", "flour", "cups"]).is_err());
    }

    #[test]
    fn test_create_user_names_are_optional() {
        let cli = Cli::try_parse_from([
            "foodgram",
            "create-user",
            "cook@example.com",
            "cook",
            "--first-name",
            "Ann",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::CreateUser {
                first_name,
                last_name,
                ..
            }) => {
                assert_eq!(first_name, "Ann");
                assert_eq!(last_name, "");
            }
            _ => panic!("expected create-user"),
        }
    }
}
