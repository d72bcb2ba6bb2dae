//! Response cache subsystem.
//!
//! # Data Flow
//! ```text
//! resolved URL + forwarded cookies
//!     → key.rs (base64 cache key)
//!     → store.rs (EXISTS / GET / SET with expiry)
//!         → redis_store.rs (production)
//!         → memory_store.rs (development, tests)
//!     → codec.rs (stored string ⇄ CapturedResponse)
//! ```
//!
//! # Design Decisions
//! - The store owns every entry; nothing is held in-process between requests
//! - Stored values are plain ASCII strings so any string store works
//! - Only status-200 responses are ever written

pub mod codec;
pub mod key;
pub mod memory_store;
pub mod redis_store;
pub mod store;

pub use codec::{deserialize, serialize, CodecError};
pub use key::CacheKey;
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use store::{CacheStore, StoreError, StoreResult};
