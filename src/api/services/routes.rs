//! `/api` 路由注册

use std::sync::Arc;

use actix_web::{dev::HttpServiceFactory, web};

use super::{catalog, recipes, redirect_routes, users};
use crate::api::middleware::TokenAuth;
use crate::storage::SeaOrmStorage;

/// 所有 REST 路由，统一经过 TokenAuth
///
/// 短链接跳转同时注册在 `/api/s/{code}/`。
///
/// 带字面量的路径（`download_shopping_cart`、`me`、`subscriptions`）
/// 必须在 `{id}` 之前注册。
pub fn api_routes(storage: Arc<SeaOrmStorage>) -> impl HttpServiceFactory {
    web::scope("/api")
        .wrap(TokenAuth::new(storage))
        // Tags
        .route("/tags/", web::get().to(catalog::list_tags))
        .route("/tags/{id:\\d+}/", web::get().to(catalog::get_tag))
        // Ingredients
        .route("/ingredients/", web::get().to(catalog::list_ingredients))
        .route(
            "/ingredients/{id:\\d+}/",
            web::get().to(catalog::get_ingredient),
        )
        // Recipes
        .route("/recipes/", web::get().to(recipes::list_recipes))
        .route("/recipes/", web::post().to(recipes::create_recipe))
        .route(
            "/recipes/download_shopping_cart/",
            web::get().to(recipes::download_shopping_cart),
        )
        .route("/recipes/{id:\\d+}/", web::get().to(recipes::get_recipe))
        .route(
            "/recipes/{id:\\d+}/",
            web::patch().to(recipes::update_recipe),
        )
        .route(
            "/recipes/{id:\\d+}/",
            web::delete().to(recipes::delete_recipe),
        )
        .route(
            "/recipes/{id:\\d+}/get-link/",
            web::get().to(recipes::get_link),
        )
        .route(
            "/recipes/{id:\\d+}/favorite/",
            web::post().to(recipes::add_favorite),
        )
        .route(
            "/recipes/{id:\\d+}/favorite/",
            web::delete().to(recipes::remove_favorite),
        )
        .route(
            "/recipes/{id:\\d+}/shopping_cart/",
            web::post().to(recipes::add_to_cart),
        )
        .route(
            "/recipes/{id:\\d+}/shopping_cart/",
            web::delete().to(recipes::remove_from_cart),
        )
        // Users
        .route("/users/", web::get().to(users::list_users))
        .route("/users/me/", web::get().to(users::me))
        .route(
            "/users/subscriptions/",
            web::get().to(users::subscriptions),
        )
        .route("/users/{id:\\d+}/", web::get().to(users::get_user))
        .route(
            "/users/{id:\\d+}/subscribe/",
            web::post().to(users::subscribe),
        )
        .route(
            "/users/{id:\\d+}/subscribe/",
            web::delete().to(users::unsubscribe),
        )
        // 短链接跳转也挂在 /api/s 下
        .service(redirect_routes())
}
