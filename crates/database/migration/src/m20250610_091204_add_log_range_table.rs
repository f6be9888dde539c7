use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LogRange::Table)
                    .if_not_exists()
                    .col(pk_auto(LogRange::Id))
                    .col(string(LogRange::FilterKey))
                    .col(big_unsigned(LogRange::FromBlock))
                    .col(big_unsigned(LogRange::ToBlock))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_log_range_filter_key")
                    .col(LogRange::FilterKey)
                    .table(LogRange::Table)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(LogRange::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum LogRange {
    Table,
    Id,
    FilterKey,
    FromBlock,
    ToBlock,
}
