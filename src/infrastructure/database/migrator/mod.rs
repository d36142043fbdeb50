//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250520_000001_create_events;
mod m20250520_000002_create_registrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250520_000001_create_events::Migration),
            Box::new(m20250520_000002_create_registrations::Migration),
        ]
    }
}
