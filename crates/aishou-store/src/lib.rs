//! Storage layer: per-user key-value file, typed session records, daily usage quota.

mod error;
pub use error::StoreError;

pub mod history;
pub mod kv;
pub mod session;
pub mod usage;

pub use history::{MAX_NAMES, NameHistory};
pub use kv::{FileStore, KeyValueStore, LocalStore, MemoryStore};
pub use session::SessionStore;
pub use usage::{DAILY_QUOTA, UsageLimiter, UsageRecord};
