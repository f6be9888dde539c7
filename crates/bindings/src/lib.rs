//! Contract bindings for the reward routers and the bridge contracts they depend on.

pub mod calls;
pub mod logs;

mod constants;
pub use constants::*;

mod withdrawal;
pub use withdrawal::{withdrawal_hash, withdrawal_storage_slot};
