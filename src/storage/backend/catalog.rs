//! Tags and ingredients

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ExprTrait, QueryFilter, QueryOrder, Set,
    sea_query::{Expr, Func, LikeExpr},
};
use tracing::info;

use super::converters::{model_to_ingredient, model_to_tag};
use super::{SeaOrmStorage, is_unique_violation, retry};
use crate::errors::{FoodgramError, Result};
use crate::storage::models::{Ingredient, MeasurementUnit, Tag};

use migration::entities::{ingredient, tag};

/// 转义 LIKE 通配符
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl SeaOrmStorage {
    pub async fn create_tag(&self, name: &str, slug: &str) -> Result<Tag> {
        let model = tag::ActiveModel {
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            ..Default::default()
        };

        let inserted = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                FoodgramError::conflict(format!("标签 slug 已存在: {}", slug))
            } else {
                FoodgramError::database_operation(format!("创建标签失败: {}", e))
            }
        })?;

        info!("Tag created: {} ({})", inserted.name, inserted.slug);
        Ok(model_to_tag(inserted))
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let db = &self.db;
        let models = retry::with_retry("list_tags", self.retry_config, || async {
            tag::Entity::find().order_by_asc(tag::Column::Id).all(db).await
        })
        .await?;
        Ok(models.into_iter().map(model_to_tag).collect())
    }

    pub async fn get_tag(&self, id: i32) -> Result<Option<Tag>> {
        let model = tag::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_tag))
    }

    pub async fn tags_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = tag::Entity::find()
            .filter(tag::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_tag).collect())
    }

    pub async fn create_ingredient(&self, name: &str, unit: MeasurementUnit) -> Result<Ingredient> {
        let model = ingredient::ActiveModel {
            name: Set(name.to_string()),
            measurement_unit: Set(unit.to_string()),
            ..Default::default()
        };

        let inserted = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                FoodgramError::conflict(format!("食材已存在: {} ({})", name, unit))
            } else {
                FoodgramError::database_operation(format!("创建食材失败: {}", e))
            }
        })?;

        info!(
            "Ingredient created: {} ({})",
            inserted.name, inserted.measurement_unit
        );
        Ok(model_to_ingredient(inserted))
    }

    /// 按名称排序列出食材，`name_prefix` 为大小写不敏感的前缀过滤
    pub async fn list_ingredients(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>> {
        let mut query = ingredient::Entity::find();

        if let Some(prefix) = name_prefix.map(str::trim).filter(|p| !p.is_empty()) {
            let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
            let lowered = Expr::expr(Func::lower(Expr::col(ingredient::Column::Name)));
            query = query.filter(lowered.like(LikeExpr::new(pattern).escape('\\')));
        }

        let models = query
            .order_by_asc(ingredient::Column::Name)
            .order_by_asc(ingredient::Column::MeasurementUnit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_ingredient).collect())
    }

    pub async fn get_ingredient(&self, id: i32) -> Result<Option<Ingredient>> {
        let model = ingredient::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_ingredient))
    }

    pub async fn ingredients_by_ids(&self, ids: &[i32]) -> Result<Vec<Ingredient>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = ingredient::Entity::find()
            .filter(ingredient::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_ingredient).collect())
    }
}
