use sea_orm_migration::prelude::*;

mod m20240901_000001_create_users;
mod m20240901_000002_create_chat;
mod m20240901_000003_create_report;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240901_000001_create_users::Migration),
            Box::new(m20240901_000002_create_chat::Migration),
            Box::new(m20240901_000003_create_report::Migration),
        ]
    }
}
