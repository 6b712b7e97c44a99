//! Short-link token persistence

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ExprTrait, PaginatorTrait, QueryFilter, Set,
    sea_query::Expr,
};
use tracing::{debug, info};

use super::converters::model_to_token;
use super::{InsertOutcome, SeaOrmStorage, is_unique_violation, retry};
use crate::errors::{FoodgramError, Result};
use crate::storage::models::Token;

use migration::entities::token;

impl SeaOrmStorage {
    pub async fn find_token_by_full_url(&self, full_url: &str) -> Result<Option<Token>> {
        let db = &self.db;
        let model = retry::with_retry("find_token_by_full_url", self.retry_config, || async {
            token::Entity::find()
                .filter(token::Column::FullUrl.eq(full_url))
                .one(db)
                .await
        })
        .await?;
        Ok(model.map(model_to_token))
    }

    /// 按短码查找（不区分启用状态）
    pub async fn find_token_by_short_url(&self, short_url: &str) -> Result<Option<Token>> {
        let db = &self.db;
        let model = retry::with_retry(
            &format!("find_token_by_short_url({})", short_url),
            self.retry_config,
            || async {
                token::Entity::find()
                    .filter(token::Column::ShortUrl.eq(short_url))
                    .one(db)
                    .await
            },
        )
        .await?;
        Ok(model.map(model_to_token))
    }

    pub async fn short_url_exists(&self, short_url: &str) -> Result<bool> {
        let count = token::Entity::find()
            .filter(token::Column::ShortUrl.eq(short_url))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// 插入新令牌；唯一约束冲突返回 [`InsertOutcome::Conflict`] 交由调用方判定
    pub async fn insert_token(&self, full_url: &str, short_url: &str) -> Result<InsertOutcome> {
        let model = token::ActiveModel {
            full_url: Set(full_url.to_string()),
            short_url: Set(short_url.to_string()),
            requests_count: Set(0),
            created_at: Set(Utc::now()),
            is_active: Set(true),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(inserted) => {
                info!("Short link issued: {} -> {}", inserted.short_url, inserted.full_url);
                Ok(InsertOutcome::Inserted(model_to_token(inserted)))
            }
            Err(e) if is_unique_violation(&e) => {
                debug!("Token insert conflict for {} / {}", full_url, short_url);
                Ok(InsertOutcome::Conflict)
            }
            Err(e) => Err(FoodgramError::database_operation(format!(
                "写入短链接失败: {}",
                e
            ))),
        }
    }

    /// 原子递增请求计数：`requests_count = requests_count + 1`
    pub async fn increment_requests(&self, id: i32) -> Result<()> {
        let db = &self.db;
        retry::with_retry(&format!("increment_requests({})", id), self.retry_config, || async {
            token::Entity::update_many()
                .col_expr(
                    token::Column::RequestsCount,
                    Expr::col(token::Column::RequestsCount).add(1),
                )
                .filter(token::Column::Id.eq(id))
                .exec(db)
                .await
        })
        .await?;
        Ok(())
    }

    /// 启用/停用令牌，返回是否找到该短码
    pub async fn set_token_active(&self, short_url: &str, active: bool) -> Result<bool> {
        let result = token::Entity::update_many()
            .col_expr(token::Column::IsActive, Expr::value(active))
            .filter(token::Column::ShortUrl.eq(short_url))
            .exec(&self.db)
            .await?;

        // MySQL 对未变化的行返回 0，需要再确认一次
        let found = result.rows_affected > 0 || self.short_url_exists(short_url).await?;
        if found {
            info!(
                "Short link {} {}",
                short_url,
                if active { "activated" } else { "deactivated" }
            );
        }
        Ok(found)
    }
}
