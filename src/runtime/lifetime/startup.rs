use crate::services::AppServices;
use crate::storage::{SeaOrmStorage, StorageFactory};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub services: AppServices,
}

/// 准备服务器启动的上下文
///
/// 连接数据库、执行迁移并构建服务层。
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    storage
        .ping()
        .await
        .context("Database is not reachable")?;

    let services = AppServices::new(storage.clone());

    let config = crate::config::get_config();
    info!("Recipe links point to: {}", config.site.public_url);
    info!("Short links served under: {}", config.short_link.base_url);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { storage, services })
}
