//! Cache pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! ProxyRequest (path, query pairs, cookie jar)
//!     → filter.rs (allow-listed cookies → "A=1; B=2")
//!     → normalize.rs (origin base + path + "?k=v,k=v")
//!     → classify.rs (binary by URL suffix)
//!     → orchestrator.rs (key → store hit/miss → origin → store write)
//!     → filter.rs (allow-listed response headers)
//!     → ProxyResponse
//! ```

pub mod classify;
pub mod filter;
pub mod orchestrator;
pub mod normalize;

pub use classify::is_binary;
pub use filter::ForwardingRules;
pub use orchestrator::CacheProxy;
pub use normalize::resolve_url;
