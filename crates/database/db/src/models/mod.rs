/// This module contains the cached log range database model.
pub(crate) mod log_range;

/// This module contains the cached log database model.
pub(crate) mod cached_log;
