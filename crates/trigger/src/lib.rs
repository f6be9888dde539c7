//! The parent to child routing trigger: pushes the funds held by a parent to child reward router
//! down to the child chain once eligible, and sees the resulting retryable ticket redeemed.

mod error;
pub use error::TriggerError;

mod fees;
pub use fees::{compute_route_fees, RouteFees, SUBMISSION_FEE_MARGIN_PERCENT};

pub mod retryable;
pub use retryable::{
    extract_retryable, settle_retryable, AlloyRetryableTracker, RetryableMessage,
    RetryableStatus, RetryableTracker, Settlement,
};

mod router;
pub use router::{check_and_route_funds, ParentToChildRouter, RouteAsset, TriggerOutcome};
