use super::{models, DatabaseError};
use crate::DatabaseConnectionProvider;

use alloy_rpc_types_eth::Log;
use router_primitives::BlockRange;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder,
};

/// The maximum number of logs inserted in a single statement, bounded by the sqlite host
/// parameter limit.
const INSERT_CHUNK_SIZE: usize = 500;

/// The [`DatabaseOperations`] trait provides methods for interacting with the log cache.
#[async_trait::async_trait]
pub trait DatabaseOperations: DatabaseConnectionProvider {
    /// Insert the logs fetched for the provided filter over the provided range, and record the
    /// range as cached.
    ///
    /// Logs already present in the cache are left untouched. Callers should perform this
    /// operation in a [`crate::DatabaseTransaction`] to make the write atomic.
    async fn insert_log_range(
        &self,
        filter_key: &str,
        range: BlockRange,
        logs: &[Log],
    ) -> Result<(), DatabaseError> {
        tracing::trace!(target: "router::db", filter_key, %range, logs = logs.len(), "Inserting log range into database.");

        let models = logs
            .iter()
            .map(|log| {
                models::cached_log::ActiveModel::from_log(filter_key, log)
                    .ok_or(DatabaseError::IncompleteLog(log.transaction_hash))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for chunk in models.chunks(INSERT_CHUNK_SIZE) {
            models::cached_log::Entity::insert_many(chunk.to_vec())
                .on_conflict(
                    OnConflict::columns([
                        models::cached_log::Column::FilterKey,
                        models::cached_log::Column::BlockNumber,
                        models::cached_log::Column::LogIndex,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .do_nothing()
                .exec(self.get_connection())
                .await?;
        }

        if i64::try_from(range.to).is_err() {
            return Err(DatabaseError::ValueOverflow(range.to));
        }
        models::log_range::ActiveModel::new(filter_key, range).insert(self.get_connection()).await?;

        Ok(())
    }

    /// Get the block ranges already cached for the provided filter, ordered by starting block.
    async fn get_cached_ranges(&self, filter_key: &str) -> Result<Vec<BlockRange>, DatabaseError> {
        Ok(models::log_range::Entity::find()
            .filter(models::log_range::Column::FilterKey.eq(filter_key))
            .order_by_asc(models::log_range::Column::FromBlock)
            .all(self.get_connection())
            .await?
            .iter()
            .filter_map(models::log_range::Model::range)
            .collect())
    }

    /// Get the cached logs for the provided filter in the provided range, ordered by block number
    /// and log index.
    async fn get_cached_logs(
        &self,
        filter_key: &str,
        range: BlockRange,
    ) -> Result<Vec<Log>, DatabaseError> {
        Ok(models::cached_log::Entity::find()
            .filter(
                Condition::all()
                    .add(models::cached_log::Column::FilterKey.eq(filter_key))
                    .add(models::cached_log::Column::BlockNumber.gte(range.from as i64))
                    .add(models::cached_log::Column::BlockNumber.lte(range.to as i64)),
            )
            .order_by_asc(models::cached_log::Column::BlockNumber)
            .order_by_asc(models::cached_log::Column::LogIndex)
            .all(self.get_connection())
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

impl<T> DatabaseOperations for T where T: DatabaseConnectionProvider {}
