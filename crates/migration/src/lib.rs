pub use sea_orm_migration::prelude::*;

mod m20240301_000000_transactions;
mod m20240315_000000_transactions_date_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000000_transactions::Migration),
            Box::new(m20240315_000000_transactions_date_index::Migration),
        ]
    }
}
