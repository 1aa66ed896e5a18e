//! Discovery job status persistence.
//!
//! [`JobStatusStore`] keeps one JSON [`scout_core::JobRecord`] per job under
//! `discovery_job:<id>` with a 24 hour TTL refreshed on every write. The
//! backing key-value store is pluggable: [`RedisStore`] in production,
//! [`MemoryStore`] for tests and single-process runs.

pub mod error;
pub mod kv;
pub mod status;

pub use error::StoreError;
pub use kv::{KeyValueStore, MemoryStore, RedisStore};
pub use status::{JobStatusStore, JOB_KEY_PREFIX, JOB_TTL};
