//! Serialized shapes returned by the HTTP API

use serde::Serialize;

use crate::storage::{RecipeIngredientAmount, RecipeRecord, Tag, User};

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserView {
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: i32,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredientAmount>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

/// 收藏、购物车、订阅列表中使用的精简食谱
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeShortView {
    pub id: i32,
    pub name: String,
    pub cooking_time: i32,
}

impl From<&RecipeRecord> for RecipeShortView {
    fn from(recipe: &RecipeRecord) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub author: UserView,
    pub recipes: Vec<RecipeShortView>,
    pub recipes_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortLinkView {
    #[serde(rename = "short-link")]
    pub short_link: String,
}
