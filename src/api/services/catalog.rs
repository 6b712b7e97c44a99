//! Tags and ingredients (read-only over HTTP)

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use super::helpers::ok_json;
use crate::errors::FoodgramError;
use crate::storage::SeaOrmStorage;

#[derive(Debug, Deserialize)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

pub async fn list_tags(
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> Result<HttpResponse, FoodgramError> {
    Ok(ok_json(storage.list_tags().await?))
}

pub async fn get_tag(
    path: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> Result<HttpResponse, FoodgramError> {
    let id = path.into_inner();
    let tag = storage
        .get_tag(id)
        .await?
        .ok_or_else(|| FoodgramError::not_found(format!("Tag {} not found", id)))?;
    Ok(ok_json(tag))
}

pub async fn list_ingredients(
    query: web::Query<IngredientQuery>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> Result<HttpResponse, FoodgramError> {
    let ingredients = storage.list_ingredients(query.name.as_deref()).await?;
    Ok(ok_json(ingredients))
}

pub async fn get_ingredient(
    path: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> Result<HttpResponse, FoodgramError> {
    let id = path.into_inner();
    let ingredient = storage
        .get_ingredient(id)
        .await?
        .ok_or_else(|| FoodgramError::not_found(format!("Ingredient {} not found", id)))?;
    Ok(ok_json(ingredient))
}
