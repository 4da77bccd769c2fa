//! # Engine Module
//!
//! The engine ties the router and the group tree together and runs each
//! request through its chain.
//!
//! ```rust
//! use http::Method;
//! use treeroute::{Context, Engine, Request};
//!
//! let engine = Engine::with_defaults();
//! engine.get("/", |ctx: &mut Context| ctx.string(200, "index"));
//!
//! let v1 = engine.group("/v1");
//! v1.use_middleware(|ctx: &mut Context| {
//!     ctx.set_header("X-Api-Version", "1");
//!     ctx.next();
//! });
//! v1.get("/hello/:name", |ctx: &mut Context| {
//!     let body = format!("hello {}", ctx.param("name"));
//!     ctx.string(200, body);
//! });
//!
//! let res = engine.handle(Request::new(Method::GET, "/v1/hello/yra"));
//! assert_eq!(res.status(), 200);
//! assert_eq!(res.body_string(), "hello yra");
//! assert_eq!(res.header("x-api-version"), Some("1"));
//! ```

mod core;

pub use core::{Engine, GroupId, RouterGroup};
