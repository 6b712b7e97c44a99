use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// 食材计量单位
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MeasurementUnit {
    G,
    Kg,
    L,
    Ml,
    Pcs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

/// 食谱中的一行食材（含用量）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeIngredientAmount {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// 完整加载的食谱：基础字段 + 标签 + 食材用量
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRecord {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredientAmount>,
}

/// 写入食谱时引用的食材
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientAmount {
    pub id: i32,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub tags: Vec<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

/// 部分更新；`None` 表示保持原值
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
}

/// 食谱列表过滤条件
#[derive(Default, Clone, Debug)]
pub struct RecipeFilter {
    /// 任一 slug 命中即可
    pub tags: Vec<String>,
    pub author: Option<i32>,
    pub favorited_by: Option<i32>,
    pub in_cart_of: Option<i32>,
    /// 排除该用户已收藏的食谱
    pub exclude_favorited_by: Option<i32>,
    pub exclude_in_cart_of: Option<i32>,
}

/// 用户 ⇄ 食谱 的收藏类列表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserList {
    Favorites,
    ShoppingCart,
}

impl UserList {
    pub fn label(&self) -> &'static str {
        match self {
            UserList::Favorites => "favorites",
            UserList::ShoppingCart => "shopping cart",
        }
    }
}

/// 短链接令牌
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub id: i32,
    pub full_url: String,
    pub short_url: String,
    pub requests_count: i64,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// 购物清单聚合后的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub storage_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_measurement_unit_parses_lowercase() {
        assert_eq!(MeasurementUnit::from_str("kg").unwrap(), MeasurementUnit::Kg);
        assert_eq!(MeasurementUnit::from_str("pcs").unwrap(), MeasurementUnit::Pcs);
        assert!(MeasurementUnit::from_str("cup").is_err());
    }

    #[test]
    fn test_measurement_unit_display_matches_serde() {
        for unit in MeasurementUnit::iter() {
            let json = serde_json::to_string(&unit).unwrap();
            assert_eq!(json, format!("\"{}\"", unit));
        }
        assert_eq!(MeasurementUnit::Ml.as_ref(), "ml");
    }
}
