//! Service layer for business logic
//!
//! Shared by the HTTP handlers and the management CLI.

mod recipes;
mod short_link;
pub mod shopping_list;
mod users;
pub mod views;

use std::sync::Arc;

use crate::storage::SeaOrmStorage;

pub use recipes::{RecipeQuery, RecipeService, validate_new_recipe, validate_recipe_changes};
pub use short_link::{MAX_GENERATION_ATTEMPTS, ShortLinkService};
pub use shopping_list::ShoppingListService;
pub use users::UserService;

/// 一次性构建的全部服务
#[derive(Clone)]
pub struct AppServices {
    pub storage: Arc<SeaOrmStorage>,
    pub short_links: Arc<ShortLinkService>,
    pub recipes: Arc<RecipeService>,
    pub users: Arc<UserService>,
    pub shopping: Arc<ShoppingListService>,
}

impl AppServices {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self {
            short_links: Arc::new(ShortLinkService::new(storage.clone())),
            recipes: Arc::new(RecipeService::new(storage.clone())),
            users: Arc::new(UserService::new(storage.clone())),
            shopping: Arc::new(ShoppingListService::new(storage.clone())),
            storage,
        }
    }
}
