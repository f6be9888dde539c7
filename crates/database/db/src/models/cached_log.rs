use alloy_primitives::{Address, Bytes, LogData, B256};
use alloy_rpc_types_eth::Log;
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents a log returned for a log filter.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cached_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    filter_key: String,
    #[sea_orm(primary_key, auto_increment = false)]
    block_number: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    log_index: i64,
    block_hash: Vec<u8>,
    tx_hash: Vec<u8>,
    tx_index: i64,
    address: Vec<u8>,
    topics: Vec<u8>,
    data: Vec<u8>,
}

/// The relation for the cached log model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// The active model behavior for the cached log model.
impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Returns the [`ActiveModel`] for the log or [`None`] if the log is pending.
    pub(crate) fn from_log(filter_key: &str, log: &Log) -> Option<Self> {
        Some(Self {
            filter_key: ActiveValue::Set(filter_key.to_owned()),
            block_number: ActiveValue::Set(i64::try_from(log.block_number?).ok()?),
            log_index: ActiveValue::Set(i64::try_from(log.log_index?).ok()?),
            block_hash: ActiveValue::Set(log.block_hash?.to_vec()),
            tx_hash: ActiveValue::Set(log.transaction_hash?.to_vec()),
            tx_index: ActiveValue::Set(i64::try_from(log.transaction_index?).ok()?),
            address: ActiveValue::Set(log.address().to_vec()),
            topics: ActiveValue::Set(log.topics().iter().flat_map(|t| t.0).collect()),
            data: ActiveValue::Set(log.data().data.to_vec()),
        })
    }
}

impl From<Model> for Log {
    fn from(value: Model) -> Self {
        let topics = value.topics.chunks_exact(32).map(B256::from_slice).collect();
        Self {
            inner: alloy_primitives::Log {
                address: Address::from_slice(&value.address),
                data: LogData::new_unchecked(topics, Bytes::from(value.data)),
            },
            block_hash: Some(B256::from_slice(&value.block_hash)),
            block_number: Some(value.block_number as u64),
            block_timestamp: None,
            transaction_hash: Some(B256::from_slice(&value.tx_hash)),
            transaction_index: Some(value.tx_index as u64),
            log_index: Some(value.log_index as u64),
            removed: false,
        }
    }
}
