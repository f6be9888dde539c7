use super::{transaction::DatabaseTransaction, DatabaseConnectionProvider};
use crate::error::DatabaseError;

use sea_orm::{Database as SeaOrmDatabase, DatabaseConnection, TransactionTrait};

/// The [`Database`] struct is responsible for interacting with the log cache database.
///
/// The [`Database`] type wraps a [`sea_orm::DatabaseConnection`]. We implement
/// [`DatabaseConnectionProvider`] for [`Database`] such that it can be used to perform the
/// operations defined in [`crate::DatabaseOperations`]. Atomic operations can be performed using
/// the [`Database::tx`] method which returns a [`DatabaseTransaction`] that also implements the
/// [`DatabaseConnectionProvider`] trait and also the [`crate::DatabaseOperations`] trait.
#[derive(Debug)]
pub struct Database {
    /// The underlying database connection.
    connection: DatabaseConnection,
}

impl Database {
    /// Creates a new [`Database`] instance associated with the provided database URL.
    pub async fn new(database_url: &str) -> Result<Self, DatabaseError> {
        tracing::debug!(target: "router::db", database_url, "Connecting to database");
        let connection = SeaOrmDatabase::connect(database_url).await?;
        Ok(Self { connection })
    }

    /// Creates a new [`DatabaseTransaction`] which can be used for atomic operations.
    pub async fn tx(&self) -> Result<DatabaseTransaction, DatabaseError> {
        Ok(DatabaseTransaction::new(self.connection.begin().await?))
    }
}

impl DatabaseConnectionProvider for Database {
    type Connection = DatabaseConnection;

    fn get_connection(&self) -> &Self::Connection {
        &self.connection
    }
}

impl From<DatabaseConnection> for Database {
    fn from(connection: DatabaseConnection) -> Self {
        Self { connection }
    }
}

#[cfg(test)]
mod test {
    use crate::{operations::DatabaseOperations, test_utils::setup_test_db};

    use alloy_primitives::{address, b256, Bytes, LogData, B256};
    use alloy_rpc_types_eth::Log;
    use router_primitives::BlockRange;

    const FILTER_KEY: &str = "0xabcdef";

    fn log(block_number: u64, log_index: u64) -> Log {
        Log {
            inner: alloy_primitives::Log {
                address: address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
                data: LogData::new_unchecked(
                    vec![b256!(
                        "0x2a9d3e2a7c0ae8ae3d0ad8f4f5ff3e6b8fa6b5de41b7c9a8e38d4e7b5f64a0b1"
                    )],
                    Bytes::from_static(&[1, 2, 3]),
                ),
            },
            block_hash: Some(B256::with_last_byte(block_number as u8)),
            block_number: Some(block_number),
            block_timestamp: None,
            transaction_hash: Some(B256::repeat_byte(log_index as u8 + 1)),
            transaction_index: Some(0),
            log_index: Some(log_index),
            removed: false,
        }
    }

    #[tokio::test]
    async fn test_database_round_trip_logs() {
        // Set up the test database.
        let db = setup_test_db().await;

        let range = BlockRange::new(10, 19).unwrap();
        let logs = vec![log(12, 0), log(12, 1), log(17, 3)];

        // Round trip the logs through the database.
        db.insert_log_range(FILTER_KEY, range, &logs).await.unwrap();
        let cached = db.get_cached_logs(FILTER_KEY, range).await.unwrap();
        assert_eq!(cached, logs);

        let ranges = db.get_cached_ranges(FILTER_KEY).await.unwrap();
        assert_eq!(ranges, vec![range]);

        // Logs and ranges are namespaced by their filter key.
        assert!(db.get_cached_logs("0x1234", range).await.unwrap().is_empty());
        assert!(db.get_cached_ranges("0x1234").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_database_duplicate_logs_are_ignored() {
        // Set up the test database.
        let db = setup_test_db().await;

        let first = BlockRange::new(0, 9).unwrap();
        let second = BlockRange::new(5, 14).unwrap();

        db.insert_log_range(FILTER_KEY, first, &[log(6, 0)]).await.unwrap();
        db.insert_log_range(FILTER_KEY, second, &[log(6, 0), log(12, 0)]).await.unwrap();

        let cached = db.get_cached_logs(FILTER_KEY, BlockRange::new(0, 14).unwrap()).await.unwrap();
        assert_eq!(cached, vec![log(6, 0), log(12, 0)]);
    }

    #[tokio::test]
    async fn test_database_cached_logs_bounded_by_range() {
        // Set up the test database.
        let db = setup_test_db().await;

        let logs = vec![log(1, 0), log(5, 0), log(9, 0)];
        db.insert_log_range(FILTER_KEY, BlockRange::new(0, 9).unwrap(), &logs).await.unwrap();

        let cached = db.get_cached_logs(FILTER_KEY, BlockRange::new(2, 8).unwrap()).await.unwrap();
        assert_eq!(cached, vec![log(5, 0)]);
    }

    #[tokio::test]
    async fn test_database_tx_rollback() {
        // Setup the test database.
        let db = setup_test_db().await;

        let range = BlockRange::new(0, 9).unwrap();

        // Insert the logs in a transaction which is rolled back.
        let tx = db.tx().await.unwrap();
        tx.insert_log_range(FILTER_KEY, range, &[log(3, 0)]).await.unwrap();
        tx.rollback().await.unwrap();

        // Nothing was written.
        assert!(db.get_cached_ranges(FILTER_KEY).await.unwrap().is_empty());
        assert!(db.get_cached_logs(FILTER_KEY, range).await.unwrap().is_empty());

        // Insert the logs in a committed transaction.
        let tx = db.tx().await.unwrap();
        tx.insert_log_range(FILTER_KEY, range, &[log(3, 0)]).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(db.get_cached_ranges(FILTER_KEY).await.unwrap(), vec![range]);
    }

    #[tokio::test]
    async fn test_database_rejects_pending_logs() {
        // Setup the test database.
        let db = setup_test_db().await;

        let mut pending = log(3, 0);
        pending.block_number = None;

        let res = db.insert_log_range(FILTER_KEY, BlockRange::new(0, 9).unwrap(), &[pending]).await;
        assert!(matches!(res, Err(crate::DatabaseError::IncompleteLog(_))));
    }
}
