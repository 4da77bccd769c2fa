//! # Router Module
//!
//! Path matching and route resolution for treeroute.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Parsing route patterns and request paths into segments
//! - Building one segment trie per HTTP method
//! - Matching incoming requests to registered patterns
//! - Binding path parameters from the matched pattern
//! - Appending the terminal handler (or the 404 handler) to a request chain
//!
//! ## Pattern syntax
//!
//! | Segment     | Matches                        | Binds                       |
//! |-------------|--------------------------------|-----------------------------|
//! | `users`     | exactly `users`                | nothing                     |
//! | `:name`     | any single segment             | `name` → that segment       |
//! | `*filepath` | every remaining segment        | `filepath` → `a/b/c`        |
//!
//! Anything after a catch-all segment is ignored, in patterns and in
//! request paths alike.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use treeroute::context::{handler_func, Context};
//! use treeroute::router::Router;
//!
//! let mut router = Router::new();
//! router.add_route(
//!     Method::GET,
//!     "/user/:name/post/:id",
//!     handler_func(|ctx: &mut Context| ctx.string(200, "post")),
//! );
//!
//! let m = router.get_route(&Method::GET, "/user/yra/post/42").unwrap();
//! assert_eq!(&*m.pattern, "/user/:name/post/:id");
//! assert_eq!(m.get_param("name"), Some("yra"));
//! assert_eq!(m.get_param("id"), Some("42"));
//! ```
//!
//! ## Priority
//!
//! Candidates at each depth are tried in registration order and the first
//! complete depth-first match wins. Register literal routes before
//! parameter routes at the same position when the literal must win.

mod core;
mod pattern;
mod trie;

pub use core::{insert_param, ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
pub use pattern::{has_trailing_after_catch_all, parse, parse_parts, Segment};
