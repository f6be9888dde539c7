use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CachedLog::Table)
                    .if_not_exists()
                    .col(string(CachedLog::FilterKey))
                    .col(big_unsigned(CachedLog::BlockNumber))
                    .col(big_unsigned(CachedLog::LogIndex))
                    .col(binary_len(CachedLog::BlockHash, 32))
                    .col(binary_len(CachedLog::TxHash, 32))
                    .col(big_unsigned(CachedLog::TxIndex))
                    .col(binary_len(CachedLog::Address, 20))
                    .col(blob(CachedLog::Topics))
                    .col(blob(CachedLog::Data))
                    .primary_key(
                        Index::create()
                            .col(CachedLog::FilterKey)
                            .col(CachedLog::BlockNumber)
                            .col(CachedLog::LogIndex),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CachedLog::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CachedLog {
    Table,
    FilterKey,
    BlockNumber,
    LogIndex,
    BlockHash,
    TxHash,
    TxIndex,
    Address,
    Topics,
    Data,
}
