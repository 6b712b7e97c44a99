//! Short link activation commands

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::ShortLinkService;
use crate::utils::is_valid_short_code;

pub async fn set_link_active(
    links: &ShortLinkService,
    short_code: String,
    active: bool,
) -> Result<(), CliError> {
    if !is_valid_short_code(&short_code) {
        return Err(CliError::ParseError(format!(
            "'{}' is not a valid short code",
            short_code
        )));
    }

    links.set_active(&short_code, active).await?;

    let state = if active {
        "activated".green()
    } else {
        "deactivated".yellow()
    };
    println!(
        "{} Short link {} {}",
        "✓".bold().green(),
        short_code.cyan(),
        state
    );
    Ok(())
}
