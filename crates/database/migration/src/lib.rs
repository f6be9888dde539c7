pub use sea_orm_migration::prelude::*;

mod m20250610_091204_add_log_range_table;
mod m20250610_091517_add_cached_log_table;

/// The migrator for the log cache database.
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250610_091204_add_log_range_table::Migration),
            Box::new(m20250610_091517_add_cached_log_table::Migration),
        ]
    }
}
