//! Pathstore: Hierarchical Path-Addressed Key/Value Store
//!
//! Every `/`-delimited path names a node that may carry a string value.
//! Each directory indexes its children both lexicographically and by creation
//! order, and a global value index answers "which path holds this value"
//! with the first match in creation-ordered pre-order.

pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod value_index;

pub use error::{ApiError, StoreError};
pub use store::{Entry, Store};
pub use types::{CreationTime, NodeId};
