use sea_orm_migration::prelude::*;

use crate::m20260901_000001_catalog_tables::{Recipe, User};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // favorites 与 shopping_cart 结构相同：(user, recipe) 唯一
        for (table, fk_user, fk_recipe, unique_name) in [
            (
                UserRecipeList::Favorites,
                "fk_favorites_user",
                "fk_favorites_recipe",
                "uq_favorite_user_recipe",
            ),
            (
                UserRecipeList::ShoppingCart,
                "fk_shopping_cart_user",
                "fk_shopping_cart_recipe",
                "uq_shopping_cart_user_recipe",
            ),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(UserRecipeList::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(UserRecipeList::UserId).integer().not_null())
                        .col(ColumnDef::new(UserRecipeList::RecipeId).integer().not_null())
                        .col(
                            ColumnDef::new(UserRecipeList::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name(fk_user)
                                .from(table, UserRecipeList::UserId)
                                .to(User::Table, User::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name(fk_recipe)
                                .from(table, UserRecipeList::RecipeId)
                                .to(Recipe::Table, Recipe::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(unique_name)
                        .table(table)
                        .col(UserRecipeList::UserId)
                        .col(UserRecipeList::RecipeId)
                        .unique()
                        .to_owned(),
                )
                .await?;
        }

        // 创建 subscriptions 表
        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscription::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subscription::UserId).integer().not_null())
                    .col(ColumnDef::new(Subscription::AuthorId).integer().not_null())
                    .col(
                        ColumnDef::new(Subscription::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_user")
                            .from(Subscription::Table, Subscription::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_author")
                            .from(Subscription::Table, Subscription::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_subscription_user_author")
                    .table(Subscription::Table)
                    .col(Subscription::UserId)
                    .col(Subscription::AuthorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscription::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserRecipeList::ShoppingCart).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserRecipeList::Favorites).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum UserRecipeList {
    #[sea_orm(iden = "favorites")]
    Favorites,
    #[sea_orm(iden = "shopping_cart")]
    ShoppingCart,
    Id,
    UserId,
    RecipeId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Subscription {
    #[sea_orm(iden = "subscriptions")]
    Table,
    Id,
    UserId,
    AuthorId,
    CreatedAt,
}
