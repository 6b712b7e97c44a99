//! Tag and ingredient catalog commands

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::storage::{MeasurementUnit, SeaOrmStorage};

pub async fn add_tag(storage: &SeaOrmStorage, name: String, slug: String) -> Result<(), CliError> {
    let slug = slug.trim().to_lowercase();
    let valid_slug = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_slug {
        return Err(CliError::ParseError(format!(
            "slug '{}' may only contain letters, digits, '-' and '_'",
            slug
        )));
    }
    if name.trim().is_empty() {
        return Err(CliError::ParseError("tag name must not be empty".to_string()));
    }

    let tag = storage.create_tag(name.trim(), &slug).await?;
    println!(
        "{} Added tag {} ({}) with id {}",
        "✓".bold().green(),
        tag.name.cyan(),
        tag.slug.blue(),
        tag.id.to_string().magenta()
    );
    Ok(())
}

pub async fn add_ingredient(
    storage: &SeaOrmStorage,
    name: String,
    unit: MeasurementUnit,
) -> Result<(), CliError> {
    if name.trim().is_empty() {
        return Err(CliError::ParseError(
            "ingredient name must not be empty".to_string(),
        ));
    }

    let ingredient = storage.create_ingredient(name.trim(), unit).await?;
    println!(
        "{} Added ingredient {} [{}] with id {}",
        "✓".bold().green(),
        ingredient.name.cyan(),
        ingredient.measurement_unit.blue(),
        ingredient.id.to_string().magenta()
    );
    Ok(())
}
