//! Config composition: source ordering and defaults.

pub(crate) mod merge_policy;
pub mod service;
