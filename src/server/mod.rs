//! # Server Module
//!
//! HTTP transport on top of `may_minihttp`: converts raw requests into
//! [`Request`](crate::Request)s, runs them through an
//! [`Engine`](crate::Engine), and writes the buffered response back.
//!
//! ```rust,no_run
//! use treeroute::server::{EngineService, HttpServer};
//! use treeroute::{Context, Engine};
//!
//! let engine = Engine::with_defaults();
//! engine.get("/", |ctx: &mut Context| ctx.string(200, "hi"));
//!
//! let handle = HttpServer(EngineService::new(engine))
//!     .start("127.0.0.1:8080")
//!     .unwrap();
//! handle.wait_ready().unwrap();
//! handle.join().unwrap();
//! ```

mod http_server;
mod request;
mod response;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{build_request, parse_form, parse_query_params, parse_request, split_target};
pub use response::{
    status_reason, write_plain_error, write_response, MAX_INTERNED_HEADER_LINES,
    MAX_RESPONSE_HEADERS,
};
pub use service::EngineService;
