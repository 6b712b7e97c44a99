//! Recipe persistence
//!
//! A recipe is written together with its tag links and ingredient amounts
//! inside one transaction. Reads load the join rows in batches and assemble
//! [`RecipeRecord`]s in memory.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::converters::model_to_tag;
use super::{SeaOrmStorage, retry};
use crate::errors::{FoodgramError, Result};
use crate::storage::models::{
    IngredientAmount, NewRecipe, RecipeChanges, RecipeFilter, RecipeIngredientAmount,
    RecipeRecord, Tag,
};

use migration::entities::{
    favorite, ingredient, recipe, recipe_ingredient, recipe_tag, shopping_cart, tag,
};

async fn insert_tag_links<C: ConnectionTrait>(db: &C, recipe_id: i32, tags: &[i32]) -> Result<()> {
    if tags.is_empty() {
        return Ok(());
    }
    let rows = tags.iter().map(|tag_id| recipe_tag::ActiveModel {
        recipe_id: Set(recipe_id),
        tag_id: Set(*tag_id),
        ..Default::default()
    });
    recipe_tag::Entity::insert_many(rows)
        .exec(db)
        .await
        .map_err(|e| FoodgramError::database_operation(format!("写入食谱标签失败: {}", e)))?;
    Ok(())
}

async fn insert_ingredient_links<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
    ingredients: &[IngredientAmount],
) -> Result<()> {
    if ingredients.is_empty() {
        return Ok(());
    }
    let rows = ingredients.iter().map(|item| recipe_ingredient::ActiveModel {
        recipe_id: Set(recipe_id),
        ingredient_id: Set(item.id),
        amount: Set(item.amount),
        ..Default::default()
    });
    recipe_ingredient::Entity::insert_many(rows)
        .exec(db)
        .await
        .map_err(|e| FoodgramError::database_operation(format!("写入食谱食材失败: {}", e)))?;
    Ok(())
}

impl SeaOrmStorage {
    pub async fn create_recipe(&self, author_id: i32, new_recipe: NewRecipe) -> Result<RecipeRecord> {
        let txn = self.db.begin().await.map_err(|e| {
            FoodgramError::database_operation(format!("开始事务失败: {}", e))
        })?;

        let model = recipe::ActiveModel {
            author_id: Set(author_id),
            name: Set(new_recipe.name),
            text: Set(new_recipe.text),
            cooking_time: Set(new_recipe.cooking_time),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| FoodgramError::database_operation(format!("创建食谱失败: {}", e)))?;

        insert_tag_links(&txn, model.id, &new_recipe.tags).await?;
        insert_ingredient_links(&txn, model.id, &new_recipe.ingredients).await?;

        txn.commit()
            .await
            .map_err(|e| FoodgramError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("Recipe created: {} (id={}, author={})", model.name, model.id, author_id);
        self.require_recipe(model.id).await
    }

    /// 部分更新；标签/食材给出时整体替换
    pub async fn update_recipe(&self, id: i32, changes: RecipeChanges) -> Result<RecipeRecord> {
        let txn = self.db.begin().await.map_err(|e| {
            FoodgramError::database_operation(format!("开始事务失败: {}", e))
        })?;

        let existing = recipe::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| FoodgramError::not_found(format!("食谱不存在: {}", id)))?;

        let scalar_changed =
            changes.name.is_some() || changes.text.is_some() || changes.cooking_time.is_some();
        if scalar_changed {
            let mut active: recipe::ActiveModel = existing.into();
            if let Some(name) = changes.name {
                active.name = Set(name);
            }
            if let Some(text) = changes.text {
                active.text = Set(text);
            }
            if let Some(cooking_time) = changes.cooking_time {
                active.cooking_time = Set(cooking_time);
            }
            active
                .update(&txn)
                .await
                .map_err(|e| FoodgramError::database_operation(format!("更新食谱失败: {}", e)))?;
        }

        if let Some(tags) = changes.tags {
            recipe_tag::Entity::delete_many()
                .filter(recipe_tag::Column::RecipeId.eq(id))
                .exec(&txn)
                .await?;
            insert_tag_links(&txn, id, &tags).await?;
        }

        if let Some(ingredients) = changes.ingredients {
            recipe_ingredient::Entity::delete_many()
                .filter(recipe_ingredient::Column::RecipeId.eq(id))
                .exec(&txn)
                .await?;
            insert_ingredient_links(&txn, id, &ingredients).await?;
        }

        txn.commit()
            .await
            .map_err(|e| FoodgramError::database_operation(format!("提交事务失败: {}", e)))?;

        debug!("Recipe updated: {}", id);
        self.require_recipe(id).await
    }

    /// 删除食谱及其关联行，返回是否确实删除
    pub async fn delete_recipe(&self, id: i32) -> Result<bool> {
        let txn = self.db.begin().await.map_err(|e| {
            FoodgramError::database_operation(format!("开始事务失败: {}", e))
        })?;

        recipe_tag::Entity::delete_many()
            .filter(recipe_tag::Column::RecipeId.eq(id))
            .exec(&txn)
            .await?;
        recipe_ingredient::Entity::delete_many()
            .filter(recipe_ingredient::Column::RecipeId.eq(id))
            .exec(&txn)
            .await?;
        favorite::Entity::delete_many()
            .filter(favorite::Column::RecipeId.eq(id))
            .exec(&txn)
            .await?;
        shopping_cart::Entity::delete_many()
            .filter(shopping_cart::Column::RecipeId.eq(id))
            .exec(&txn)
            .await?;
        let result = recipe::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit()
            .await
            .map_err(|e| FoodgramError::database_operation(format!("提交事务失败: {}", e)))?;

        if result.rows_affected > 0 {
            info!("Recipe deleted: {}", id);
        }
        Ok(result.rows_affected > 0)
    }

    pub async fn get_recipe(&self, id: i32) -> Result<Option<RecipeRecord>> {
        let db = &self.db;
        let model = retry::with_retry(&format!("get_recipe({})", id), self.retry_config, || async {
            recipe::Entity::find_by_id(id).one(db).await
        })
        .await?;

        match model {
            Some(model) => Ok(self.load_details(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn require_recipe(&self, id: i32) -> Result<RecipeRecord> {
        self.get_recipe(id)
            .await?
            .ok_or_else(|| FoodgramError::not_found(format!("食谱不存在: {}", id)))
    }

    pub async fn recipe_exists(&self, id: i32) -> Result<bool> {
        let count = recipe::Entity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    /// 作者 id（不加载关联）
    pub async fn recipe_author(&self, id: i32) -> Result<Option<i32>> {
        let author = recipe::Entity::find_by_id(id)
            .select_only()
            .column(recipe::Column::AuthorId)
            .into_tuple::<i32>()
            .one(&self.db)
            .await?;
        Ok(author)
    }

    /// 按过滤条件列出食谱，最新的在前
    pub async fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<RecipeRecord>> {
        let mut query = recipe::Entity::find();

        if let Some(author) = filter.author {
            query = query.filter(recipe::Column::AuthorId.eq(author));
        }

        if !filter.tags.is_empty() {
            let ids: Vec<i32> = recipe_tag::Entity::find()
                .select_only()
                .column(recipe_tag::Column::RecipeId)
                .join(JoinType::InnerJoin, recipe_tag::Relation::Tag.def())
                .filter(tag::Column::Slug.is_in(filter.tags.iter().cloned()))
                .distinct()
                .into_tuple::<i32>()
                .all(&self.db)
                .await?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(recipe::Column::Id.is_in(ids));
        }

        if let Some(user_id) = filter.favorited_by {
            let ids = self.favorite_recipe_ids(user_id).await?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(recipe::Column::Id.is_in(ids));
        }

        if let Some(user_id) = filter.in_cart_of {
            let ids = self.cart_recipe_ids(user_id).await?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(recipe::Column::Id.is_in(ids));
        }

        if let Some(user_id) = filter.exclude_favorited_by {
            let ids = self.favorite_recipe_ids(user_id).await?;
            if !ids.is_empty() {
                query = query.filter(recipe::Column::Id.is_not_in(ids));
            }
        }

        if let Some(user_id) = filter.exclude_in_cart_of {
            let ids = self.cart_recipe_ids(user_id).await?;
            if !ids.is_empty() {
                query = query.filter(recipe::Column::Id.is_not_in(ids));
            }
        }

        let models = query
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id)
            .all(&self.db)
            .await?;

        self.load_details(models).await
    }

    /// 某作者的食谱（最新在前），`limit` 为空时不限
    pub async fn recipes_by_author(
        &self,
        author_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeRecord>> {
        let models = recipe::Entity::find()
            .filter(recipe::Column::AuthorId.eq(author_id))
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        self.load_details(models).await
    }

    pub async fn count_recipes_by_author(&self, author_id: i32) -> Result<u64> {
        let count = recipe::Entity::find()
            .filter(recipe::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// 批量加载标签与食材，保持 `models` 原有顺序
    async fn load_details(&self, models: Vec<recipe::Model>) -> Result<Vec<RecipeRecord>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

        let tag_links = recipe_tag::Entity::find()
            .filter(recipe_tag::Column::RecipeId.is_in(ids.iter().copied()))
            .order_by_asc(recipe_tag::Column::Id)
            .find_also_related(tag::Entity)
            .all(&self.db)
            .await?;

        let mut tags_by_recipe: HashMap<i32, Vec<Tag>> = HashMap::new();
        for (link, tag_model) in tag_links {
            if let Some(tag_model) = tag_model {
                tags_by_recipe
                    .entry(link.recipe_id)
                    .or_default()
                    .push(model_to_tag(tag_model));
            }
        }

        let ingredient_links = recipe_ingredient::Entity::find()
            .filter(recipe_ingredient::Column::RecipeId.is_in(ids.iter().copied()))
            .order_by_asc(recipe_ingredient::Column::Id)
            .find_also_related(ingredient::Entity)
            .all(&self.db)
            .await?;

        let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredientAmount>> = HashMap::new();
        for (link, ingredient_model) in ingredient_links {
            if let Some(ingredient_model) = ingredient_model {
                ingredients_by_recipe
                    .entry(link.recipe_id)
                    .or_default()
                    .push(RecipeIngredientAmount {
                        id: ingredient_model.id,
                        name: ingredient_model.name,
                        measurement_unit: ingredient_model.measurement_unit,
                        amount: link.amount,
                    });
            }
        }

        Ok(models
            .into_iter()
            .map(|model| RecipeRecord {
                tags: tags_by_recipe.remove(&model.id).unwrap_or_default(),
                ingredients: ingredients_by_recipe.remove(&model.id).unwrap_or_default(),
                id: model.id,
                author_id: model.author_id,
                name: model.name,
                text: model.text,
                cooking_time: model.cooking_time,
                created_at: model.created_at,
            })
            .collect())
    }
}
