//! Favorites, shopping cart and subscriptions
//!
//! Duplicate adds are checked up front; concurrent inserts that slip past the
//! check are caught by the unique indexes and reported the same way.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::debug;

use super::{SeaOrmStorage, is_unique_violation};
use crate::errors::{FoodgramError, Result};
use crate::storage::models::UserList;

use migration::entities::{favorite, shopping_cart, subscription};

impl SeaOrmStorage {
    /// 将食谱加入用户列表；已存在时返回校验错误
    pub async fn add_to_list(&self, list: UserList, user_id: i32, recipe_id: i32) -> Result<()> {
        if self.list_has(list, user_id, recipe_id).await? {
            return Err(already_in(list, recipe_id));
        }

        let created_at = Utc::now();
        let inserted = match list {
            UserList::Favorites => favorite::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                created_at: Set(created_at),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map(|_| ()),
            UserList::ShoppingCart => shopping_cart::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                created_at: Set(created_at),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map(|_| ()),
        };

        match inserted {
            Ok(()) => {
                debug!("Recipe {} added to {} of user {}", recipe_id, list.label(), user_id);
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => Err(already_in(list, recipe_id)),
            Err(e) => Err(FoodgramError::database_operation(format!(
                "写入 {} 失败: {}",
                list.label(),
                e
            ))),
        }
    }

    /// 从用户列表移除食谱；不存在时返回校验错误
    pub async fn remove_from_list(&self, list: UserList, user_id: i32, recipe_id: i32) -> Result<()> {
        let result = match list {
            UserList::Favorites => {
                favorite::Entity::delete_many()
                    .filter(favorite::Column::UserId.eq(user_id))
                    .filter(favorite::Column::RecipeId.eq(recipe_id))
                    .exec(&self.db)
                    .await?
            }
            UserList::ShoppingCart => {
                shopping_cart::Entity::delete_many()
                    .filter(shopping_cart::Column::UserId.eq(user_id))
                    .filter(shopping_cart::Column::RecipeId.eq(recipe_id))
                    .exec(&self.db)
                    .await?
            }
        };

        if result.rows_affected == 0 {
            return Err(FoodgramError::validation(format!(
                "Recipe {} is not in your {}",
                recipe_id,
                list.label()
            )));
        }
        debug!("Recipe {} removed from {} of user {}", recipe_id, list.label(), user_id);
        Ok(())
    }

    pub async fn list_has(&self, list: UserList, user_id: i32, recipe_id: i32) -> Result<bool> {
        Ok(!self.list_members(list, user_id, &[recipe_id]).await?.is_empty())
    }

    /// `recipe_ids` 中位于用户列表内的那些
    pub async fn list_members(
        &self,
        list: UserList,
        user_id: i32,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let ids: Vec<i32> = match list {
            UserList::Favorites => {
                favorite::Entity::find()
                    .select_only()
                    .column(favorite::Column::RecipeId)
                    .filter(favorite::Column::UserId.eq(user_id))
                    .filter(favorite::Column::RecipeId.is_in(recipe_ids.iter().copied()))
                    .into_tuple::<i32>()
                    .all(&self.db)
                    .await?
            }
            UserList::ShoppingCart => {
                shopping_cart::Entity::find()
                    .select_only()
                    .column(shopping_cart::Column::RecipeId)
                    .filter(shopping_cart::Column::UserId.eq(user_id))
                    .filter(shopping_cart::Column::RecipeId.is_in(recipe_ids.iter().copied()))
                    .into_tuple::<i32>()
                    .all(&self.db)
                    .await?
            }
        };
        Ok(ids.into_iter().collect())
    }

    /// 已收藏的食谱 id
    pub async fn favorite_recipe_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        let ids = favorite::Entity::find()
            .select_only()
            .column(favorite::Column::RecipeId)
            .filter(favorite::Column::UserId.eq(user_id))
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;
        Ok(ids)
    }

    /// 购物车中的食谱 id
    pub async fn cart_recipe_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        let ids = shopping_cart::Entity::find()
            .select_only()
            .column(shopping_cart::Column::RecipeId)
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .order_by_asc(shopping_cart::Column::Id)
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;
        Ok(ids)
    }

    pub async fn subscribe(&self, user_id: i32, author_id: i32) -> Result<()> {
        if user_id == author_id {
            return Err(FoodgramError::validation("You cannot subscribe to yourself"));
        }
        if self.is_subscribed(user_id, author_id).await? {
            return Err(FoodgramError::validation(format!(
                "Already subscribed to user {}",
                author_id
            )));
        }

        let inserted = subscription::ActiveModel {
            user_id: Set(user_id),
            author_id: Set(author_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        match inserted {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(FoodgramError::validation(format!(
                "Already subscribed to user {}",
                author_id
            ))),
            Err(e) => Err(FoodgramError::database_operation(format!("订阅失败: {}", e))),
        }
    }

    pub async fn unsubscribe(&self, user_id: i32, author_id: i32) -> Result<()> {
        let result = subscription::Entity::delete_many()
            .filter(subscription::Column::UserId.eq(user_id))
            .filter(subscription::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(FoodgramError::validation(format!(
                "You are not subscribed to user {}",
                author_id
            )));
        }
        Ok(())
    }

    pub async fn is_subscribed(&self, user_id: i32, author_id: i32) -> Result<bool> {
        let count = subscription::Entity::find()
            .filter(subscription::Column::UserId.eq(user_id))
            .filter(subscription::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// `author_ids` 中被 `user_id` 订阅的作者
    pub async fn subscribed_among(&self, user_id: i32, author_ids: &[i32]) -> Result<HashSet<i32>> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let ids: Vec<i32> = subscription::Entity::find()
            .select_only()
            .column(subscription::Column::AuthorId)
            .filter(subscription::Column::UserId.eq(user_id))
            .filter(subscription::Column::AuthorId.is_in(author_ids.iter().copied()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;
        Ok(ids.into_iter().collect())
    }

    /// 用户订阅的全部作者 id（按订阅时间）
    pub async fn subscribed_author_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        let ids = subscription::Entity::find()
            .select_only()
            .column(subscription::Column::AuthorId)
            .filter(subscription::Column::UserId.eq(user_id))
            .order_by_asc(subscription::Column::Id)
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;
        Ok(ids)
    }
}

fn already_in(list: UserList, recipe_id: i32) -> FoodgramError {
    FoodgramError::validation(format!(
        "Recipe {} is already in your {}",
        recipe_id,
        list.label()
    ))
}
