//! Router core module - route table and per-request match.
//!
//! Matching goes through one [`TrieNode`] tree per HTTP method. The tree
//! only answers *which pattern* matches a path; the flat handler table
//! answers *which handler* that pattern invokes. Both are written together
//! in [`Router::add_route`] so every stored pattern has exactly one handler.

use http::Method;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::pattern::{has_trailing_after_catch_all, parse, parse_parts, Segment};
use super::trie::TrieNode;
use crate::context::{handler_func, Context, HandlerFunc};

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Names are `Arc<str>` because they come from registered patterns;
/// values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Bind `key` to `value`, replacing an existing binding so keys stay unique
pub fn insert_param(params: &mut ParamVec, key: &str, value: String) {
    if let Some(slot) = params.iter_mut().find(|(k, _)| k.as_ref() == key) {
        slot.1 = value;
    } else {
        params.push((Arc::from(key), value));
    }
}

/// Result of successfully matching a request path to a registered pattern
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    /// The registered pattern that matched (e.g. `/user/:name`)
    pub pattern: Arc<str>,
    /// Parameters bound from the request path
    pub params: ParamVec,
}

impl RouteMatch {
    /// Get a bound parameter by name
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert params to a `HashMap`
    /// Note: This allocates - use get_param() in hot paths instead
    #[must_use]
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Built-in terminal handler for unmatched requests
fn not_found(ctx: &mut Context) {
    let body = format!("404 NOT FOUND: {}\n", ctx.path());
    ctx.string(404, body);
}

/// Method-keyed trie router with a flat `(method, pattern) -> handler` table
#[derive(Clone)]
pub struct Router {
    roots: HashMap<Method, TrieNode>,
    handlers: HashMap<(Method, Arc<str>), HandlerFunc>,
    not_found: HandlerFunc,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self {
            roots: HashMap::new(),
            handlers: HashMap::new(),
            not_found: handler_func(not_found),
        }
    }

    /// Replace the terminal handler used when no route matches
    pub fn set_not_found(&mut self, handler: HandlerFunc) {
        self.not_found = handler;
    }

    /// Register `handler` for `method` and `pattern`.
    ///
    /// Registering the same pattern again replaces its handler. Segments
    /// after a catch-all are dropped with a warning; the route is still
    /// registered.
    pub fn add_route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
        if has_trailing_after_catch_all(pattern) {
            warn!(
                method = %method,
                pattern = %pattern,
                "Segments after catch-all are ignored"
            );
        }

        let pattern: Arc<str> = Arc::from(pattern);
        let parts = parse_parts(&pattern);
        self.roots
            .entry(method.clone())
            .or_insert_with(TrieNode::root)
            .insert(&pattern, &parts, 0);

        if self
            .handlers
            .insert((method.clone(), Arc::clone(&pattern)), handler)
            .is_some()
        {
            warn!(
                method = %method,
                pattern = %pattern,
                "Replaced existing route handler"
            );
        }

        debug!(
            method = %method,
            pattern = %pattern,
            total_routes = self.handlers.len(),
            "Route registered"
        );
    }

    /// Match `path` against the routes registered for `method`.
    ///
    /// Parameters are bound by rewalking the *matched pattern*: a `:name`
    /// segment binds the path segment at the same index; a `*name` segment
    /// binds every remaining path segment joined with `/`. A catch-all
    /// with no name (`/files/*`) matches the same way but binds nothing.
    #[must_use]
    pub fn get_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let path_parts = parse_parts(path);
        let root = self.roots.get(method)?;
        let node = root.search(&path_parts, 0)?;
        let pattern = Arc::clone(node.pattern()?);

        let mut params = ParamVec::new();
        for (i, segment) in parse(&pattern).into_iter().enumerate() {
            match segment {
                Segment::Literal(_) => {}
                Segment::Param(name) => {
                    if let Some(value) = path_parts.get(i) {
                        insert_param(&mut params, name, (*value).to_string());
                    }
                }
                Segment::CatchAll(name) => {
                    if !name.is_empty() {
                        let rest = path_parts.get(i..).unwrap_or_default();
                        insert_param(&mut params, name, rest.join("/"));
                    }
                    break;
                }
            }
        }

        Some(RouteMatch { pattern, params })
    }

    /// Handler registered for an exact `(method, pattern)` pair
    #[must_use]
    pub fn handler(&self, method: &Method, pattern: &Arc<str>) -> Option<&HandlerFunc> {
        self.handlers.get(&(method.clone(), Arc::clone(pattern)))
    }

    /// Bind the context's params and append its terminal handler.
    ///
    /// Appends the matched route's handler, or the not-found handler when
    /// nothing matches. The chain is not started here.
    pub fn prepare(&self, ctx: &mut Context) {
        let matched = self
            .get_route(ctx.method(), ctx.path())
            .and_then(|m| self.handler(ctx.method(), &m.pattern).map(|h| (m, Arc::clone(h))));

        match matched {
            Some((route_match, handler)) => {
                debug!(
                    request_id = %ctx.request_id(),
                    method = %ctx.method(),
                    path = %ctx.path(),
                    route_pattern = %route_match.pattern,
                    path_params = ?route_match.params,
                    "Route matched"
                );
                ctx.set_params(route_match.params);
                ctx.push_handlers([handler]);
            }
            None => {
                info!(
                    request_id = %ctx.request_id(),
                    method = %ctx.method(),
                    path = %ctx.path(),
                    "No route matched"
                );
                ctx.push_handlers([Arc::clone(&self.not_found)]);
            }
        }
    }

    /// Resolve and run the full chain for `ctx`
    pub fn handle(&self, ctx: &mut Context) {
        self.prepare(ctx);
        ctx.next();
    }

    /// All registered `(method, pattern)` pairs, sorted for display
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, Arc<str>)> {
        let mut routes: Vec<(Method, Arc<str>)> = self
            .handlers
            .keys()
            .map(|(m, p)| (m.clone(), Arc::clone(p)))
            .collect();
        routes.sort_by(|a, b| (a.0.as_str(), &*a.1).cmp(&(b.0.as_str(), &*b.1)));
        routes
    }

    /// Patterns still reachable through the tries.
    ///
    /// A pattern overwritten at the same tree position by a differently
    /// spelled one (e.g. `/a/b` then `/a//b`) is no longer reachable, even
    /// though its handler entry remains.
    #[must_use]
    pub fn reachable_patterns(&self, method: &Method) -> Vec<Arc<str>> {
        let mut out = Vec::new();
        if let Some(root) = self.roots.get(method) {
            root.collect_patterns(&mut out);
        }
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Print all registered routes to stdout
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.len());
        for (method, pattern) in self.routes() {
            println!("[route] {method:>6} {pattern}");
        }
    }
}
