//! Recipe business rules
//!
//! Validation, author-only writes, and viewer-relative flags
//! (`is_favorited`, `is_in_shopping_cart`, `author.is_subscribed`).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::info;

use super::views::{RecipeShortView, RecipeView, UserView};
use crate::errors::{FoodgramError, Result};
use crate::storage::{
    IngredientAmount, NewRecipe, RecipeChanges, RecipeFilter, RecipeRecord, SeaOrmStorage, User,
    UserList,
};

pub const MAX_RECIPE_NAME_CHARS: usize = 256;

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(FoodgramError::validation("name: this field may not be blank"));
    }
    if name.chars().count() > MAX_RECIPE_NAME_CHARS {
        return Err(FoodgramError::validation(format!(
            "name: ensure this field has no more than {} characters",
            MAX_RECIPE_NAME_CHARS
        )));
    }
    Ok(())
}

fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(FoodgramError::validation("text: this field may not be blank"));
    }
    Ok(())
}

fn validate_cooking_time(minutes: i32) -> Result<()> {
    if minutes < 1 {
        return Err(FoodgramError::validation(
            "cooking_time: must be at least 1 minute",
        ));
    }
    Ok(())
}

fn validate_tags(tags: &[i32]) -> Result<()> {
    if tags.is_empty() {
        return Err(FoodgramError::validation("tags: at least one tag is required"));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = tags.iter().find(|id| !seen.insert(**id)) {
        return Err(FoodgramError::validation(format!("tags: duplicate tag {}", dup)));
    }
    Ok(())
}

fn validate_ingredients(ingredients: &[IngredientAmount]) -> Result<()> {
    if ingredients.is_empty() {
        return Err(FoodgramError::validation(
            "ingredients: at least one ingredient is required",
        ));
    }
    let mut seen = HashSet::new();
    for item in ingredients {
        if !seen.insert(item.id) {
            return Err(FoodgramError::validation(format!(
                "ingredients: duplicate ingredient {}",
                item.id
            )));
        }
        if item.amount < 1 {
            return Err(FoodgramError::validation(format!(
                "ingredients: amount for ingredient {} must be at least 1",
                item.id
            )));
        }
    }
    Ok(())
}

/// 纯字段校验，不访问数据库
pub fn validate_new_recipe(recipe: &NewRecipe) -> Result<()> {
    validate_name(&recipe.name)?;
    validate_text(&recipe.text)?;
    validate_cooking_time(recipe.cooking_time)?;
    validate_tags(&recipe.tags)?;
    validate_ingredients(&recipe.ingredients)
}

pub fn validate_recipe_changes(changes: &RecipeChanges) -> Result<()> {
    if let Some(name) = &changes.name {
        validate_name(name)?;
    }
    if let Some(text) = &changes.text {
        validate_text(text)?;
    }
    if let Some(minutes) = changes.cooking_time {
        validate_cooking_time(minutes)?;
    }
    if let Some(tags) = &changes.tags {
        validate_tags(tags)?;
    }
    if let Some(ingredients) = &changes.ingredients {
        validate_ingredients(ingredients)?;
    }
    Ok(())
}

/// 列表查询参数（已解析）
#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    pub tags: Vec<String>,
    pub author: Option<i32>,
    /// `Some(false)` 表示排除，`None` 表示不过滤
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

pub struct RecipeService {
    storage: Arc<SeaOrmStorage>,
}

impl RecipeService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 检查引用的标签与食材都存在
    async fn check_references(
        &self,
        tags: Option<&[i32]>,
        ingredients: Option<&[IngredientAmount]>,
    ) -> Result<()> {
        if let Some(tags) = tags {
            let found: HashSet<i32> = self
                .storage
                .tags_by_ids(tags)
                .await?
                .into_iter()
                .map(|t| t.id)
                .collect();
            if let Some(missing) = tags.iter().find(|id| !found.contains(*id)) {
                return Err(FoodgramError::validation(format!(
                    "tags: tag {} does not exist",
                    missing
                )));
            }
        }

        if let Some(ingredients) = ingredients {
            let ids: Vec<i32> = ingredients.iter().map(|i| i.id).collect();
            let found: HashSet<i32> = self
                .storage
                .ingredients_by_ids(&ids)
                .await?
                .into_iter()
                .map(|i| i.id)
                .collect();
            if let Some(missing) = ids.iter().find(|id| !found.contains(*id)) {
                return Err(FoodgramError::validation(format!(
                    "ingredients: ingredient {} does not exist",
                    missing
                )));
            }
        }
        Ok(())
    }

    pub async fn create(&self, author: &User, recipe: NewRecipe) -> Result<RecipeView> {
        validate_new_recipe(&recipe)?;
        self.check_references(Some(&recipe.tags), Some(&recipe.ingredients))
            .await?;

        let record = self.storage.create_recipe(author.id, recipe).await?;
        let mut views = self.render(vec![record], Some(author)).await?;
        views
            .pop()
            .ok_or_else(|| FoodgramError::database_operation("新建食谱读取失败"))
    }

    /// 确认食谱存在且属于 `user`
    async fn ensure_author(&self, user: &User, recipe_id: i32) -> Result<()> {
        match self.storage.recipe_author(recipe_id).await? {
            None => Err(FoodgramError::not_found(format!(
                "Recipe {} not found",
                recipe_id
            ))),
            Some(author_id) if author_id != user.id => Err(FoodgramError::forbidden(
                "Only the author can modify this recipe",
            )),
            Some(_) => Ok(()),
        }
    }

    pub async fn update(
        &self,
        user: &User,
        recipe_id: i32,
        changes: RecipeChanges,
    ) -> Result<RecipeView> {
        self.ensure_author(user, recipe_id).await?;
        validate_recipe_changes(&changes)?;
        self.check_references(changes.tags.as_deref(), changes.ingredients.as_deref())
            .await?;

        let record = self.storage.update_recipe(recipe_id, changes).await?;
        let mut views = self.render(vec![record], Some(user)).await?;
        views
            .pop()
            .ok_or_else(|| FoodgramError::database_operation("更新后食谱读取失败"))
    }

    pub async fn delete(&self, user: &User, recipe_id: i32) -> Result<()> {
        self.ensure_author(user, recipe_id).await?;
        if !self.storage.delete_recipe(recipe_id).await? {
            return Err(FoodgramError::not_found(format!(
                "Recipe {} not found",
                recipe_id
            )));
        }
        info!("User {} deleted recipe {}", user.id, recipe_id);
        Ok(())
    }

    pub async fn get(&self, viewer: Option<&User>, recipe_id: i32) -> Result<RecipeView> {
        let record = self
            .storage
            .get_recipe(recipe_id)
            .await?
            .ok_or_else(|| FoodgramError::not_found(format!("Recipe {} not found", recipe_id)))?;
        let mut views = self.render(vec![record], viewer).await?;
        views
            .pop()
            .ok_or_else(|| FoodgramError::not_found(format!("Recipe {} not found", recipe_id)))
    }

    /// 列表；收藏/购物车过滤仅对已识别用户生效
    pub async fn list(&self, viewer: Option<&User>, query: RecipeQuery) -> Result<Vec<RecipeView>> {
        let viewer_id = viewer.map(|u| u.id);
        let filter = RecipeFilter {
            tags: query.tags,
            author: query.author,
            favorited_by: viewer_id.filter(|_| query.is_favorited == Some(true)),
            in_cart_of: viewer_id.filter(|_| query.is_in_shopping_cart == Some(true)),
            exclude_favorited_by: viewer_id.filter(|_| query.is_favorited == Some(false)),
            exclude_in_cart_of: viewer_id.filter(|_| query.is_in_shopping_cart == Some(false)),
        };
        let records = self.storage.list_recipes(&filter).await?;
        self.render(records, viewer).await
    }

    pub async fn add_to_list(
        &self,
        user: &User,
        list: UserList,
        recipe_id: i32,
    ) -> Result<RecipeShortView> {
        let record = self
            .storage
            .get_recipe(recipe_id)
            .await?
            .ok_or_else(|| FoodgramError::not_found(format!("Recipe {} not found", recipe_id)))?;
        self.storage.add_to_list(list, user.id, recipe_id).await?;
        Ok(RecipeShortView::from(&record))
    }

    pub async fn remove_from_list(&self, user: &User, list: UserList, recipe_id: i32) -> Result<()> {
        if !self.storage.recipe_exists(recipe_id).await? {
            return Err(FoodgramError::not_found(format!(
                "Recipe {} not found",
                recipe_id
            )));
        }
        self.storage.remove_from_list(list, user.id, recipe_id).await
    }

    /// 结合观看者状态组装视图
    async fn render(&self, records: Vec<RecipeRecord>, viewer: Option<&User>) -> Result<Vec<RecipeView>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let recipe_ids: Vec<i32> = records.iter().map(|r| r.id).collect();
        let mut author_ids: Vec<i32> = records.iter().map(|r| r.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<i32, User> = self
            .storage
            .users_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let (favorited, in_cart, subscribed) = match viewer {
            Some(user) => (
                self.storage
                    .list_members(UserList::Favorites, user.id, &recipe_ids)
                    .await?,
                self.storage
                    .list_members(UserList::ShoppingCart, user.id, &recipe_ids)
                    .await?,
                self.storage.subscribed_among(user.id, &author_ids).await?,
            ),
            None => (HashSet::new(), HashSet::new(), HashSet::new()),
        };

        records
            .into_iter()
            .map(|record| {
                let author = authors.get(&record.author_id).cloned().ok_or_else(|| {
                    FoodgramError::database_operation(format!(
                        "食谱 {} 的作者 {} 不存在",
                        record.id, record.author_id
                    ))
                })?;
                Ok(RecipeView {
                    author: UserView::new(author, subscribed.contains(&record.author_id)),
                    is_favorited: favorited.contains(&record.id),
                    is_in_shopping_cart: in_cart.contains(&record.id),
                    id: record.id,
                    tags: record.tags,
                    ingredients: record.ingredients,
                    name: record.name,
                    text: record.text,
                    cooking_time: record.cooking_time,
                })
            })
            .collect()
    }
}
