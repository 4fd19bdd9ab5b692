//! # Stepweave Cache
//!
//! Single-process, in-memory caching for tool invocations:
//!
//! - [`CacheStore`]: a mutex-guarded TTL key/value store with lazy eviction
//! - [`canonical_key`]: order-independent keys for `(tool, parameters)`
//! - [`InvocationCache`]: get-or-compute-and-store around a tool call
//!
//! Nothing is persisted and nothing crosses the process boundary.

pub mod invocation;
pub mod key;
pub mod store;

pub use invocation::{CachedCall, InvocationCache, ToolCache};
pub use key::{canonical_json, canonical_key};
pub use store::{CacheEntry, CacheStats, CacheStore, spawn_sweeper};
