use sea_orm_migration::prelude::*;

use crate::m20240301_000000_transactions::Transactions;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEX_NAME: &str = "idx-transactions-date";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing is always `ORDER BY date DESC`.
        manager
            .create_index(
                Index::create()
                    .name(INDEX_NAME)
                    .table(Transactions::Table)
                    .col(Transactions::Date)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(INDEX_NAME)
                    .table(Transactions::Table)
                    .to_owned(),
            )
            .await
    }
}
