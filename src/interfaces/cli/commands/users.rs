//! Create user command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::storage::{NewUser, SeaOrmStorage};

pub async fn create_user(
    storage: &SeaOrmStorage,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
) -> Result<(), CliError> {
    if !email.contains('@') {
        return Err(CliError::ParseError(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    if username.trim().is_empty() {
        return Err(CliError::ParseError("username must not be empty".to_string()));
    }

    let (user, token) = storage
        .create_user(NewUser {
            email,
            username,
            first_name,
            last_name,
        })
        .await?;

    println!(
        "{} Created user {} (id {}) <{}>",
        "✓".bold().green(),
        user.username.cyan(),
        user.id.to_string().magenta(),
        user.email.blue()
    );
    println!("  {} {}", "API token:".yellow(), token.bold());
    println!(
        "  {}",
        format!("Send it as `Authorization: Token {}`", token).dimmed()
    );

    Ok(())
}
