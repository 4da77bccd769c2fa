//! # Middleware Module
//!
//! Ready-made chain entries. Each one is an ordinary
//! [`Handler`](crate::Handler) that runs code before and/or after calling
//! [`Context::next`](crate::Context::next).
//!
//! - [`recovery`] - turns downstream panics into a 500 JSON response
//! - [`logger`] - one structured log line per request with its latency
//! - [`MetricsMiddleware`] - atomic request/latency/error counters
//! - [`CorsMiddleware`] - preflight handling and CORS response headers
//! - [`AuthMiddleware`] - static token check on `authorization`
//!
//! ```rust
//! use treeroute::middleware::{AuthMiddleware, MetricsMiddleware};
//! use treeroute::Engine;
//!
//! let metrics = MetricsMiddleware::new();
//! let engine = Engine::with_defaults();
//! engine.use_middleware(metrics.clone());
//! engine.group("/admin").use_middleware(AuthMiddleware::new("Bearer s3cret"));
//! assert_eq!(metrics.request_count(), 0);
//! ```

mod auth;
mod cors;
mod logger;
mod metrics;
mod recovery;

pub use auth::AuthMiddleware;
pub use cors::CorsMiddleware;
pub use logger::logger;
pub use metrics::MetricsMiddleware;
pub use recovery::{recovery, INTERNAL_SERVER_ERROR};
