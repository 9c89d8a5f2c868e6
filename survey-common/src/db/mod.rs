//! Response store access: fixed query, backends, cache and accessor

pub mod accessor;
pub mod cache;
#[cfg(feature = "sqlx")]
pub mod sqlx_store;
pub mod store;

pub use accessor::ResponseAccessor;
pub use cache::{CachedSnapshot, SnapshotCache};
#[cfg(feature = "sqlx")]
pub use sqlx_store::{Backend, SqlxStore};
pub use store::{FixedQuery, ResponseStore, UnavailableStore};
