//! Shopping-list aggregation
//!
//! Sums ingredient amounts across every recipe in a user's cart, grouped by
//! (ingredient name, measurement unit) and ordered by name then unit.

use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, sea_query::Expr,
};
use tracing::debug;

use super::{SeaOrmStorage, retry};
use crate::errors::Result;
use crate::storage::models::ShoppingListLine;

use migration::entities::{ingredient, recipe_ingredient};

#[derive(Debug, FromQueryResult)]
struct AggregatedRow {
    name: String,
    measurement_unit: String,
    total_amount: i64,
}

impl SeaOrmStorage {
    pub async fn shopping_list(&self, user_id: i32) -> Result<Vec<ShoppingListLine>> {
        let recipe_ids = self.cart_recipe_ids(user_id).await?;
        if recipe_ids.is_empty() {
            debug!("Shopping cart of user {} is empty", user_id);
            return Ok(Vec::new());
        }

        // MySQL 的 SUM(INT) 返回 DECIMAL，显式转换为整数
        let total = if self.backend_name == "mysql" {
            Expr::cust("CAST(SUM(`recipe_ingredients`.`amount`) AS SIGNED)")
        } else {
            recipe_ingredient::Column::Amount.sum()
        };

        let db = &self.db;
        let rows = retry::with_retry(
            &format!("shopping_list({})", user_id),
            self.retry_config,
            || {
                let total = total.clone();
                let recipe_ids = recipe_ids.clone();
                async move {
                    recipe_ingredient::Entity::find()
                        .select_only()
                        .column_as(ingredient::Column::Name, "name")
                        .column_as(ingredient::Column::MeasurementUnit, "measurement_unit")
                        .column_as(total, "total_amount")
                        .join(JoinType::InnerJoin, recipe_ingredient::Relation::Ingredient.def())
                        .filter(recipe_ingredient::Column::RecipeId.is_in(recipe_ids))
                        .group_by(ingredient::Column::Name)
                        .group_by(ingredient::Column::MeasurementUnit)
                        .order_by_asc(ingredient::Column::Name)
                        .order_by_asc(ingredient::Column::MeasurementUnit)
                        .into_model::<AggregatedRow>()
                        .all(db)
                        .await
                }
            },
        )
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ShoppingListLine {
                name: row.name,
                measurement_unit: row.measurement_unit,
                total_amount: row.total_amount,
            })
            .collect())
    }
}
