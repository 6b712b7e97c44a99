//! User persistence

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

use super::converters::model_to_user;
use super::{SeaOrmStorage, is_unique_violation, retry};
use crate::errors::{FoodgramError, Result};
use crate::storage::models::{NewUser, User};
use crate::utils::generate_random_code;

use migration::entities::user;

/// API 令牌长度
const AUTH_TOKEN_LENGTH: usize = 40;

impl SeaOrmStorage {
    /// 创建用户，返回用户和其 API 令牌
    pub async fn create_user(&self, new_user: NewUser) -> Result<(User, String)> {
        let auth_token = generate_random_code(AUTH_TOKEN_LENGTH);

        let model = user::ActiveModel {
            email: Set(new_user.email.clone()),
            username: Set(new_user.username.clone()),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            auth_token: Set(auth_token.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let inserted = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                FoodgramError::conflict(format!(
                    "用户已存在: {} / {}",
                    new_user.username, new_user.email
                ))
            } else {
                FoodgramError::database_operation(format!("创建用户失败: {}", e))
            }
        })?;

        info!("User created: {} (id={})", inserted.username, inserted.id);
        Ok((model_to_user(inserted), auth_token))
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        let db = &self.db;
        let model = retry::with_retry(&format!("get_user({})", id), self.retry_config, || async {
            user::Entity::find_by_id(id).one(db).await
        })
        .await?;
        Ok(model.map(model_to_user))
    }

    /// 按 API 令牌查找用户
    pub async fn find_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let db = &self.db;
        let model = retry::with_retry("find_user_by_token", self.retry_config, || async {
            user::Entity::find()
                .filter(user::Column::AuthToken.eq(token))
                .one(db)
                .await
        })
        .await?;
        Ok(model.map(model_to_user))
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_user).collect())
    }

    pub async fn users_by_ids(&self, ids: &[i32]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_user).collect())
    }
}
