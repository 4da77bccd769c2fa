//! # Context Module
//!
//! Per-request state and the cooperative chain executor.
//!
//! - [`Context`] - method, path, bound params, response buffer, handler chain and cursor
//! - [`Handler`] / [`HandlerFunc`] - the type every middleware and route handler has
//! - [`Request`] / [`Response`] - the transport-independent request input and
//!   buffered response output

mod core;
mod handler;
mod request;
mod response;

pub use core::Context;
pub use handler::{handler_func, Handler, HandlerFunc};
pub use request::Request;
pub use response::{HeaderVec, Response, MAX_INLINE_HEADERS};
