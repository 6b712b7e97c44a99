//! SeaORM storage backend
//!
//! Persistence for users, the recipe catalog, per-user recipe lists,
//! subscriptions and short-link tokens. Supports SQLite, MySQL/MariaDB and
//! PostgreSQL; the backend is inferred from the database URL.

mod catalog;
mod connection;
mod converters;
mod recipes;
pub mod retry;
mod shopping;
mod tokens;
mod user_lists;
mod users;

use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use tracing::{info, warn};

use crate::errors::{FoodgramError, Result};
use crate::storage::models::{StorageConfig, Token};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_ingredient, model_to_tag, model_to_token, model_to_user};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(FoodgramError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 唯一约束冲突（并发插入的安全网）
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// 令牌插入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(Token),
    /// full_url 或 short_url 唯一约束冲突
    Conflict,
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(FoodgramError::database_config("database_url 未设置"));
        }

        let config = crate::config::get_config();
        let retry_config = retry::RetryConfig::from(&config.database);

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, config.database.pool_size).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config,
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn get_backend_config(&self) -> StorageConfig {
        StorageConfig {
            storage_type: self.backend_name.clone(),
        }
    }

    /// 连通性检查（health 端点使用）
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| FoodgramError::database_connection(format!("数据库不可达: {}", e)))
    }

    /// 关闭连接池
    pub async fn close(&self) -> Result<()> {
        self.db
            .clone()
            .close()
            .await
            .map_err(|e| FoodgramError::database_operation(format!("关闭数据库失败: {}", e)))?;
        info!("Database connection closed");
        Ok(())
    }
}
