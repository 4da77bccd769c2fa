//! # treeroute
//!
//! **treeroute** is a small HTTP request router built around a segment
//! trie, route groups with prefix-scoped middleware, and a cooperative
//! handler chain. It serves requests on the `may` coroutine runtime through
//! `may_minihttp`.
//!
//! ## Overview
//!
//! Given a method and a path, treeroute deterministically picks one
//! registered pattern, binds its path parameters, and runs an ordered chain:
//! every middleware of every group whose prefix matches the path, followed
//! by the route's handler. Middleware decide whether to continue by calling
//! [`Context::next`], so each one can run code both before and after
//! everything downstream.
//!
//! ## Architecture
//!
//! - **[`router`]** - pattern parsing, per-method segment tries, param binding
//! - **[`context`]** - per-request state, handler chain and cursor, response buffer
//! - **[`engine`]** - the [`Engine`] and its [`RouterGroup`] tree
//! - **[`middleware`]** - recovery, logger, metrics, CORS, static token auth
//! - **[`server`]** - `may_minihttp` transport adapter
//! - **[`logging`]** / **[`runtime_config`]** - environment-driven setup
//! - **[`cli`]** - the `treeroute` binary
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as HttpServer<br/>(may_minihttp)
//!     participant Engine
//!     participant Router as Router<br/>(segment trie)
//!     participant Chain as Context chain
//!
//!     Client->>Server: GET /v1/hello/yra
//!     Server->>Server: Parse method, path,<br/>query, form, headers
//!     Server->>Engine: handle(Request)
//!     Engine->>Engine: Collect middleware of every group<br/>whose prefix matches the path
//!     Engine->>Router: prepare(ctx)
//!     Router->>Router: Trie search, bind {name: "yra"}
//!     alt No Route Match
//!         Router->>Chain: append 404 handler
//!     else Matched
//!         Router->>Chain: append route handler
//!     end
//!     Engine->>Chain: next()
//!     Chain->>Chain: recovery → logger → group middleware → handler
//!     alt Handler Panics
//!         Chain->>Chain: recovery writes 500<br/>{"message":"Internal Server Error"}
//!     end
//!     Chain-->>Engine: Response
//!     Engine-->>Server: Response
//!     Server-->>Client: status, headers, body
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use treeroute::{Context, Engine, Request};
//!
//! let engine = Engine::with_defaults();
//! engine.get("/hello/:name", |ctx: &mut Context| {
//!     let body = format!("hello {}", ctx.param("name"));
//!     ctx.string(200, body);
//! });
//! engine.get("/assets/*filepath", |ctx: &mut Context| {
//!     let path = ctx.param("filepath").to_string();
//!     ctx.string(200, path);
//! });
//!
//! let res = engine.handle(Request::new(Method::GET, "/assets/css/site.css"));
//! assert_eq!(res.body_string(), "css/site.css");
//!
//! let res = engine.handle(Request::new(Method::GET, "/missing"));
//! assert_eq!(res.status(), 404);
//! assert_eq!(res.body_string(), "404 NOT FOUND: /missing\n");
//! ```
//!
//! ## Runtime Considerations
//!
//! treeroute uses the `may` coroutine runtime, not tokio or async-std:
//!
//! - Each connection is served on a coroutine; a chain runs synchronously on it
//! - Stack size is configurable via the `TREEROUTE_STACK_SIZE` environment variable
//! - Register routes and middleware before starting the server

pub mod cli;
pub mod context;
pub mod engine;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use context::{Context, Handler, HandlerFunc, Request, Response};
pub use engine::{Engine, GroupId, RouterGroup};
pub use ids::RequestId;
pub use router::{RouteMatch, Router};
