//! Recipe endpoints

use std::sync::Arc;

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, info};

use super::helpers::{created_json, no_content, ok_json, parse_recipe_query};
use crate::api::middleware::{CurrentUser, MaybeUser};
use crate::errors::FoodgramError;
use crate::services::views::ShortLinkView;
use crate::services::{RecipeService, ShoppingListService, ShortLinkService};
use crate::storage::{NewRecipe, RecipeChanges, UserList};

pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.pdf";

pub async fn list_recipes(
    req: HttpRequest,
    viewer: MaybeUser,
    recipes: web::Data<Arc<RecipeService>>,
) -> Result<HttpResponse, FoodgramError> {
    let query = parse_recipe_query(req.query_string())?;
    debug!("Listing recipes with {:?}", query);
    let views = recipes.list(viewer.user(), query).await?;
    Ok(ok_json(views))
}

pub async fn create_recipe(
    user: CurrentUser,
    body: web::Json<NewRecipe>,
    recipes: web::Data<Arc<RecipeService>>,
) -> Result<HttpResponse, FoodgramError> {
    let view = recipes.create(&user.0, body.into_inner()).await?;
    Ok(created_json(view))
}

pub async fn get_recipe(
    path: web::Path<i32>,
    viewer: MaybeUser,
    recipes: web::Data<Arc<RecipeService>>,
) -> Result<HttpResponse, FoodgramError> {
    let view = recipes.get(viewer.user(), path.into_inner()).await?;
    Ok(ok_json(view))
}

pub async fn update_recipe(
    path: web::Path<i32>,
    user: CurrentUser,
    body: web::Json<RecipeChanges>,
    recipes: web::Data<Arc<RecipeService>>,
) -> Result<HttpResponse, FoodgramError> {
    let view = recipes
        .update(&user.0, path.into_inner(), body.into_inner())
        .await?;
    Ok(ok_json(view))
}

pub async fn delete_recipe(
    path: web::Path<i32>,
    user: CurrentUser,
    recipes: web::Data<Arc<RecipeService>>,
) -> Result<HttpResponse, FoodgramError> {
    recipes.delete(&user.0, path.into_inner()).await?;
    Ok(no_content())
}

/// 获取（或首次创建）食谱的短链接
pub async fn get_link(
    path: web::Path<i32>,
    short_links: web::Data<Arc<ShortLinkService>>,
) -> Result<HttpResponse, FoodgramError> {
    let short_link = short_links.recipe_short_link(path.into_inner()).await?;
    Ok(ok_json(ShortLinkView { short_link }))
}

pub async fn add_favorite(
    path: web::Path<i32>,
    user: CurrentUser,
    recipes: web::Data<Arc<RecipeService>>,
) -> Result<HttpResponse, FoodgramError> {
    let view = recipes
        .add_to_list(&user.0, UserList::Favorites, path.into_inner())
        .await?;
    Ok(created_json(view))
}

pub async fn remove_favorite(
    path: web::Path<i32>,
    user: CurrentUser,
    recipes: web::Data<Arc<RecipeService>>,
) -> Result<HttpResponse, FoodgramError> {
    recipes
        .remove_from_list(&user.0, UserList::Favorites, path.into_inner())
        .await?;
    Ok(no_content())
}

pub async fn add_to_cart(
    path: web::Path<i32>,
    user: CurrentUser,
    recipes: web::Data<Arc<RecipeService>>,
) -> Result<HttpResponse, FoodgramError> {
    let view = recipes
        .add_to_list(&user.0, UserList::ShoppingCart, path.into_inner())
        .await?;
    Ok(created_json(view))
}

pub async fn remove_from_cart(
    path: web::Path<i32>,
    user: CurrentUser,
    recipes: web::Data<Arc<RecipeService>>,
) -> Result<HttpResponse, FoodgramError> {
    recipes
        .remove_from_list(&user.0, UserList::ShoppingCart, path.into_inner())
        .await?;
    Ok(no_content())
}

/// 购物清单 PDF 下载
pub async fn download_shopping_cart(
    user: CurrentUser,
    shopping: web::Data<Arc<ShoppingListService>>,
) -> Result<HttpResponse, FoodgramError> {
    let document = shopping.render_for_user(user.0.id).await?;
    info!(
        "Rendered shopping list for user {} ({} bytes)",
        user.0.id,
        document.len()
    );

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(SHOPPING_LIST_FILENAME.to_string())],
        })
        .body(document))
}
