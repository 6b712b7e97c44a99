//! 集成测试公共环境
//!
//! 每个测试使用独立的临时 SQLite 数据库，互不干扰。

#![allow(dead_code)]

use std::sync::{Arc, Once};

use tempfile::TempDir;

use foodgram::config::{StaticConfig, init_config_with};
use foodgram::storage::{
    IngredientAmount, MeasurementUnit, NewRecipe, NewUser, RecipeRecord, SeaOrmStorage, Tag, User,
};

static INIT: Once = Once::new();

pub fn init_static_config() {
    INIT.call_once(|| {
        init_config_with(StaticConfig::default());
    });
}

/// 测试数据库；`_dir` 需与 storage 一同存活
pub struct TestDb {
    pub storage: Arc<SeaOrmStorage>,
    _dir: TempDir,
}

pub async fn test_db() -> TestDb {
    init_static_config();

    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("foodgram_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");

    TestDb {
        storage: Arc::new(storage),
        _dir: dir,
    }
}

pub async fn create_user(storage: &SeaOrmStorage, username: &str) -> (User, String) {
    storage
        .create_user(NewUser {
            email: format!("{}@example.com", username),
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "Cook".to_string(),
        })
        .await
        .expect("Failed to create user")
}

pub async fn create_tag(storage: &SeaOrmStorage, slug: &str) -> Tag {
    storage
        .create_tag(&slug.to_uppercase(), slug)
        .await
        .expect("Failed to create tag")
}

pub async fn create_ingredient(storage: &SeaOrmStorage, name: &str, unit: MeasurementUnit) -> i32 {
    storage
        .create_ingredient(name, unit)
        .await
        .expect("Failed to create ingredient")
        .id
}

pub fn recipe(name: &str, tags: Vec<i32>, ingredients: Vec<(i32, i32)>) -> NewRecipe {
    NewRecipe {
        name: name.to_string(),
        text: format!("How to cook {}", name),
        cooking_time: 15,
        tags,
        ingredients: ingredients
            .into_iter()
            .map(|(id, amount)| IngredientAmount { id, amount })
            .collect(),
    }
}

pub async fn create_recipe(
    storage: &SeaOrmStorage,
    author_id: i32,
    new_recipe: NewRecipe,
) -> RecipeRecord {
    storage
        .create_recipe(author_id, new_recipe)
        .await
        .expect("Failed to create recipe")
}

/// 与服务器一致的路由装配
pub fn app_config(
    storage: Arc<SeaOrmStorage>,
) -> impl Fn(&mut actix_web::web::ServiceConfig) + Clone {
    use foodgram::api::services::{AppStartTime, configure_app};
    use foodgram::services::AppServices;

    configure_app(
        AppServices::new(storage),
        AppStartTime {
            start_datetime: chrono::Utc::now(),
        },
    )
}

pub fn auth_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Token {}", token))
}
