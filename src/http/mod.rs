//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, access log)
//!     → robots.rs (static /robots.txt)
//!     → request.rs (path, query pairs, cookie jar)
//!     → [cache pipeline produces a ProxyResponse]
//!     → response.rs (allow-listed headers, raw or text body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod robots;
pub mod server;

pub use request::{CookieJar, ProxyRequest};
pub use response::{Body, CapturedResponse, Headers, ProxyResponse};
pub use server::HttpServer;
