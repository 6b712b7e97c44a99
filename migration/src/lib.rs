pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260901_000001_catalog_tables;
mod m20260901_000002_user_lists;
mod m20260901_000003_short_link_tokens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_catalog_tables::Migration),
            Box::new(m20260901_000002_user_lists::Migration),
            Box::new(m20260901_000003_short_link_tokens::Migration),
        ]
    }
}
