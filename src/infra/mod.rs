//! Infrastructure layer for the vessel risk engine
//!
//! Contains trait definitions and implementations for:
//! - Risk record history (PostgreSQL, in-memory)
//! - Watch list and description table lookups
//! - Caching (in-memory LRU with TTL)
//! - Retry with backoff for provider calls

mod cache;
mod error;
mod memory;
pub mod postgres;
mod retry;
mod traits;

pub use cache::{CacheStats, LruCache};
pub use error::*;
pub use memory::{MemoryRiskStore, StaticWatchList};
pub use postgres::{PgDescriptionTable, PgRiskStore, PgWatchList};
pub use retry::{
    classify_transport_error, is_retryable_status, retry_provider_call, RetryConfig, RetryOutcome,
};
pub use traits::*;
