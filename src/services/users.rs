//! Users and subscriptions

use std::sync::Arc;

use super::views::{RecipeShortView, SubscriptionView, UserView};
use crate::errors::{FoodgramError, Result};
use crate::storage::{SeaOrmStorage, User};

pub struct UserService {
    storage: Arc<SeaOrmStorage>,
}

impl UserService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self, viewer: Option<&User>) -> Result<Vec<UserView>> {
        let users = self.storage.list_users().await?;
        let subscribed = match viewer {
            Some(viewer) => {
                let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
                self.storage.subscribed_among(viewer.id, &ids).await?
            }
            None => Default::default(),
        };
        Ok(users
            .into_iter()
            .map(|user| {
                let is_subscribed = subscribed.contains(&user.id);
                UserView::new(user, is_subscribed)
            })
            .collect())
    }

    pub async fn get(&self, viewer: Option<&User>, id: i32) -> Result<UserView> {
        let user = self.require_user(id).await?;
        let is_subscribed = match viewer {
            Some(viewer) => self.storage.is_subscribed(viewer.id, id).await?,
            None => false,
        };
        Ok(UserView::new(user, is_subscribed))
    }

    pub fn me(&self, user: &User) -> UserView {
        UserView::new(user.clone(), false)
    }

    async fn require_user(&self, id: i32) -> Result<User> {
        self.storage
            .get_user(id)
            .await?
            .ok_or_else(|| FoodgramError::not_found(format!("User {} not found", id)))
    }

    pub async fn subscribe(
        &self,
        user: &User,
        author_id: i32,
        recipes_limit: Option<u64>,
    ) -> Result<SubscriptionView> {
        let author = self.require_user(author_id).await?;
        self.storage.subscribe(user.id, author_id).await?;
        self.subscription_view(author, recipes_limit).await
    }

    pub async fn unsubscribe(&self, user: &User, author_id: i32) -> Result<()> {
        self.require_user(author_id).await?;
        self.storage.unsubscribe(user.id, author_id).await
    }

    /// 当前用户订阅的作者，附带其食谱
    pub async fn subscriptions(
        &self,
        user: &User,
        recipes_limit: Option<u64>,
    ) -> Result<Vec<SubscriptionView>> {
        let author_ids = self.storage.subscribed_author_ids(user.id).await?;
        let authors = self.storage.users_by_ids(&author_ids).await?;

        let mut views = Vec::with_capacity(authors.len());
        // 保持订阅顺序
        for author_id in author_ids {
            if let Some(author) = authors.iter().find(|a| a.id == author_id) {
                views.push(self.subscription_view(author.clone(), recipes_limit).await?);
            }
        }
        Ok(views)
    }

    async fn subscription_view(
        &self,
        author: User,
        recipes_limit: Option<u64>,
    ) -> Result<SubscriptionView> {
        let recipes = self
            .storage
            .recipes_by_author(author.id, recipes_limit)
            .await?;
        let recipes_count = self.storage.count_recipes_by_author(author.id).await?;

        Ok(SubscriptionView {
            author: UserView::new(author, true),
            recipes: recipes.iter().map(RecipeShortView::from).collect(),
            recipes_count,
        })
    }
}
