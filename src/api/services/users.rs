//! User and subscription endpoints

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use super::helpers::{created_json, no_content, ok_json};
use crate::api::middleware::{CurrentUser, MaybeUser};
use crate::errors::FoodgramError;
use crate::services::UserService;

#[derive(Debug, Default, Deserialize)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<u64>,
}

pub async fn list_users(
    viewer: MaybeUser,
    users: web::Data<Arc<UserService>>,
) -> Result<HttpResponse, FoodgramError> {
    Ok(ok_json(users.list(viewer.user()).await?))
}

pub async fn me(
    user: CurrentUser,
    users: web::Data<Arc<UserService>>,
) -> Result<HttpResponse, FoodgramError> {
    Ok(ok_json(users.me(&user.0)))
}

pub async fn get_user(
    path: web::Path<i32>,
    viewer: MaybeUser,
    users: web::Data<Arc<UserService>>,
) -> Result<HttpResponse, FoodgramError> {
    Ok(ok_json(users.get(viewer.user(), path.into_inner()).await?))
}

pub async fn subscriptions(
    user: CurrentUser,
    query: web::Query<RecipesLimitQuery>,
    users: web::Data<Arc<UserService>>,
) -> Result<HttpResponse, FoodgramError> {
    let views = users.subscriptions(&user.0, query.recipes_limit).await?;
    Ok(ok_json(views))
}

pub async fn subscribe(
    path: web::Path<i32>,
    user: CurrentUser,
    query: web::Query<RecipesLimitQuery>,
    users: web::Data<Arc<UserService>>,
) -> Result<HttpResponse, FoodgramError> {
    let view = users
        .subscribe(&user.0, path.into_inner(), query.recipes_limit)
        .await?;
    Ok(created_json(view))
}

pub async fn unsubscribe(
    path: web::Path<i32>,
    user: CurrentUser,
    users: web::Data<Arc<UserService>>,
) -> Result<HttpResponse, FoodgramError> {
    users.unsubscribe(&user.0, path.into_inner()).await?;
    Ok(no_content())
}
