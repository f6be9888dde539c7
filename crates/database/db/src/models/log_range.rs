use router_primitives::BlockRange;
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents a block range fully fetched for a log filter.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "log_range")]
pub struct Model {
    #[sea_orm(primary_key)]
    id: i32,
    pub(crate) filter_key: String,
    pub(crate) from_block: i64,
    pub(crate) to_block: i64,
}

/// The relation for the log range model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// The active model behavior for the log range model.
impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Returns a new [`ActiveModel`] for the range fetched for the filter.
    pub(crate) fn new(filter_key: &str, range: BlockRange) -> Self {
        Self {
            id: ActiveValue::NotSet,
            filter_key: ActiveValue::Set(filter_key.to_owned()),
            from_block: ActiveValue::Set(range.from as i64),
            to_block: ActiveValue::Set(range.to as i64),
        }
    }
}

impl Model {
    /// Returns the [`BlockRange`] represented by the model.
    pub(crate) fn range(&self) -> Option<BlockRange> {
        BlockRange::new(self.from_block as u64, self.to_block as u64)
    }
}
