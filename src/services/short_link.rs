//! Short-link issuing and resolution
//!
//! A token is created lazily the first time a full URL asks for a short link
//! and reused afterwards. Under concurrent first requests the unique index on
//! `full_url` decides the winner; the loser re-reads the stored row.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::get_config;
use crate::errors::{FoodgramError, Result};
use crate::storage::{InsertOutcome, SeaOrmStorage, Token};
use crate::utils::{SHORT_CODE_LENGTH, generate_random_code, is_valid_short_code};

/// 单次签发最多尝试生成的短码数
pub const MAX_GENERATION_ATTEMPTS: usize = 64;

type CodeGenerator = Arc<dyn Fn() -> String + Send + Sync>;

pub struct ShortLinkService {
    storage: Arc<SeaOrmStorage>,
    generator: CodeGenerator,
}

impl ShortLinkService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self::with_generator(storage, Arc::new(|| generate_random_code(SHORT_CODE_LENGTH)))
    }

    /// 使用自定义短码生成器（测试碰撞路径时使用）
    pub fn with_generator(storage: Arc<SeaOrmStorage>, generator: CodeGenerator) -> Self {
        Self { storage, generator }
    }

    /// 食谱在前端的完整地址
    pub fn recipe_full_url(recipe_id: i32) -> String {
        let config = get_config();
        format!(
            "{}/recipes/{}",
            config.site.public_url.trim_end_matches('/'),
            recipe_id
        )
    }

    /// 对外返回的短链接
    pub fn public_short_link(short_url: &str) -> String {
        let config = get_config();
        format!(
            "{}/{}",
            config.short_link.base_url.trim_end_matches('/'),
            short_url
        )
    }

    /// 为食谱签发（或复用）短链接，返回完整的短链接地址
    pub async fn recipe_short_link(&self, recipe_id: i32) -> Result<String> {
        if !self.storage.recipe_exists(recipe_id).await? {
            return Err(FoodgramError::not_found(format!(
                "Recipe {} not found",
                recipe_id
            )));
        }
        let token = self.get_or_create(&Self::recipe_full_url(recipe_id)).await?;
        Ok(Self::public_short_link(&token.short_url))
    }

    /// 按 full_url 查找或创建令牌；已存在时计数加一
    pub async fn get_or_create(&self, full_url: &str) -> Result<Token> {
        if let Some(token) = self.reuse_existing(full_url).await? {
            return Ok(token);
        }

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let short_url = (self.generator)();
            if self.storage.short_url_exists(&short_url).await? {
                debug!("Short code collision on attempt {}: {}", attempt, short_url);
                continue;
            }

            match self.storage.insert_token(full_url, &short_url).await? {
                InsertOutcome::Inserted(token) => return Ok(token),
                InsertOutcome::Conflict => {
                    // 并发请求已为同一 full_url 建好令牌
                    if let Some(token) = self.reuse_existing(full_url).await? {
                        return Ok(token);
                    }
                    debug!("Short code taken concurrently on attempt {}: {}", attempt, short_url);
                }
            }
        }

        warn!(
            "Gave up issuing a short link for {} after {} attempts",
            full_url, MAX_GENERATION_ATTEMPTS
        );
        Err(FoodgramError::short_link_exhausted(format!(
            "Could not generate a unique short link after {} attempts",
            MAX_GENERATION_ATTEMPTS
        )))
    }

    async fn reuse_existing(&self, full_url: &str) -> Result<Option<Token>> {
        match self.storage.find_token_by_full_url(full_url).await? {
            Some(mut token) => {
                self.storage.increment_requests(token.id).await?;
                token.requests_count += 1;
                Ok(Some(token))
            }
            None => Ok(None),
        }
    }

    /// 解析短码：命中启用中的令牌时计数加一并返回 full_url
    pub async fn resolve(&self, short_url: &str) -> Result<Option<String>> {
        if !is_valid_short_code(short_url) {
            return Ok(None);
        }

        match self.storage.find_token_by_short_url(short_url).await? {
            Some(token) if token.is_active => {
                self.storage.increment_requests(token.id).await?;
                Ok(Some(token.full_url))
            }
            Some(_) => {
                debug!("Short code {} is inactive", short_url);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub async fn set_active(&self, short_url: &str, active: bool) -> Result<()> {
        if !self.storage.set_token_active(short_url, active).await? {
            return Err(FoodgramError::not_found(format!(
                "Short link not found: {}",
                short_url
            )));
        }
        Ok(())
    }
}
