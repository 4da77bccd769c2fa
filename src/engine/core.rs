//! Engine and route groups.
//!
//! The engine owns the router and a flat registry of groups. Groups refer
//! to their parent by index ([`GroupId`]) and to the engine through a shared
//! handle, so user code can keep several group handles alive at once
//! without any global state.
//!
//! ## Middleware resolution
//!
//! For every request, *all* groups are scanned in registration order and
//! each group whose prefix is a string prefix of the request path
//! contributes its whole middleware list. Ordering therefore follows group
//! registration, not nesting: a sibling group registered earlier runs its
//! middleware before a deeper group registered later.

use http::Method;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use crate::context::{handler_func, Context, Handler, HandlerFunc, Request, Response};
use crate::middleware::{logger, recovery};
use crate::router::Router;

/// Index of a group in the engine's registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

impl GroupId {
    /// The root group every engine starts with
    pub const ROOT: GroupId = GroupId(0);
}

struct GroupData {
    prefix: String,
    middlewares: Vec<HandlerFunc>,
    parent: Option<GroupId>,
}

pub(crate) struct EngineState {
    router: Router,
    groups: Vec<GroupData>,
}

impl EngineState {
    fn resolve_middleware(&self, path: &str) -> Vec<HandlerFunc> {
        self.groups
            .iter()
            .filter(|g| path.starts_with(g.prefix.as_str()))
            .flat_map(|g| g.middlewares.iter().map(Arc::clone))
            .collect()
    }

    fn group(&self, id: GroupId) -> &GroupData {
        // Ids are only minted by `push_group`, and groups are never removed
        &self.groups[id.0]
    }

    fn push_group(&mut self, parent: GroupId, suffix: &str) -> GroupId {
        let prefix = format!("{}{}", self.group(parent).prefix, suffix);
        let id = GroupId(self.groups.len());
        debug!(prefix = %prefix, parent = parent.0, group = id.0, "Group created");
        self.groups.push(GroupData {
            prefix,
            middlewares: Vec::new(),
            parent: Some(parent),
        });
        id
    }
}

/// Shared handle to the routing table and group registry.
///
/// Cloning is cheap; every clone refers to the same engine. Routes and
/// middleware are registered during setup, then the engine is handed to
/// the server and only read while serving.
#[derive(Clone)]
pub struct Engine {
    state: Arc<RwLock<EngineState>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with an empty root group and no routes
    #[must_use]
    pub fn new() -> Self {
        let root = GroupData {
            prefix: String::new(),
            middlewares: Vec::new(),
            parent: None,
        };
        Self {
            state: Arc::new(RwLock::new(EngineState {
                router: Router::new(),
                groups: vec![root],
            })),
        }
    }

    /// Create an engine whose root group runs [`recovery`] then [`logger`].
    ///
    /// Recovery is the outermost entry of every chain, so panics anywhere
    /// below it become a 500 response.
    #[must_use]
    pub fn with_defaults() -> Self {
        let engine = Self::new();
        engine.use_middleware(recovery()).use_middleware(logger());
        engine
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle to the root group (prefix `""`)
    #[must_use]
    pub fn root(&self) -> RouterGroup {
        RouterGroup {
            id: GroupId::ROOT,
            engine: self.clone(),
        }
    }

    /// Create a group under the root group
    pub fn group(&self, prefix: &str) -> RouterGroup {
        self.root().group(prefix)
    }

    /// Append middleware to the root group
    pub fn use_middleware<H: Handler>(&self, middleware: H) -> &Self {
        self.root().use_middleware(middleware);
        self
    }

    /// Register a route on the root group
    pub fn add_route<H: Handler>(&self, method: Method, pattern: &str, handler: H) {
        self.root().add_route(method, pattern, handler);
    }

    pub fn get<H: Handler>(&self, pattern: &str, handler: H) {
        self.add_route(Method::GET, pattern, handler);
    }

    pub fn post<H: Handler>(&self, pattern: &str, handler: H) {
        self.add_route(Method::POST, pattern, handler);
    }

    pub fn put<H: Handler>(&self, pattern: &str, handler: H) {
        self.add_route(Method::PUT, pattern, handler);
    }

    pub fn delete<H: Handler>(&self, pattern: &str, handler: H) {
        self.add_route(Method::DELETE, pattern, handler);
    }

    pub fn patch<H: Handler>(&self, pattern: &str, handler: H) {
        self.add_route(Method::PATCH, pattern, handler);
    }

    /// Middleware from every group whose prefix matches `path`, in group
    /// registration order
    #[must_use]
    pub fn resolve_middleware(&self, path: &str) -> Vec<HandlerFunc> {
        self.read().resolve_middleware(path)
    }

    /// Run `request` through its chain and return the buffered response.
    ///
    /// The engine lock is released before the chain starts, so handlers
    /// never run while holding it.
    pub fn handle(&self, request: Request) -> Response {
        let mut ctx = Context::new(request);
        {
            let state = self.read();
            let middlewares = state.resolve_middleware(ctx.path());
            ctx.push_handlers(middlewares);
            state.router.prepare(&mut ctx);
        }
        ctx.next();
        ctx.into_response()
    }

    /// Snapshot of the router, for inspection
    #[must_use]
    pub fn router(&self) -> Router {
        self.read().router.clone()
    }

    /// All registered `(method, pattern)` pairs, sorted
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, Arc<str>)> {
        self.read().router.routes()
    }

    /// Number of groups, root included
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.read().groups.len()
    }
}

/// Handle to one group of the engine.
///
/// A group has a path prefix (its parent's prefix plus its own suffix) and
/// an append-only middleware list. Routes registered through a group get
/// the group's prefix prepended.
#[derive(Clone)]
pub struct RouterGroup {
    id: GroupId,
    engine: Engine,
}

impl RouterGroup {
    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Full prefix of this group
    #[must_use]
    pub fn prefix(&self) -> String {
        self.engine.read().group(self.id).prefix.clone()
    }

    /// The group this one was created from; `None` for the root
    #[must_use]
    pub fn parent(&self) -> Option<RouterGroup> {
        let parent = self.engine.read().group(self.id).parent?;
        Some(RouterGroup {
            id: parent,
            engine: self.engine.clone(),
        })
    }

    /// The engine this group belongs to
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Create a nested group with prefix `self.prefix() + suffix`
    pub fn group(&self, suffix: &str) -> RouterGroup {
        let id = self.engine.write().push_group(self.id, suffix);
        RouterGroup {
            id,
            engine: self.engine.clone(),
        }
    }

    /// Append middleware to this group.
    ///
    /// Takes effect for requests resolved afterwards.
    pub fn use_middleware<H: Handler>(&self, middleware: H) -> &Self {
        let mut state = self.engine.write();
        let group = &mut state.groups[self.id.0];
        group.middlewares.push(handler_func(middleware));
        debug!(
            prefix = %group.prefix,
            middleware_count = group.middlewares.len(),
            "Middleware added"
        );
        self
    }

    /// Register `handler` for `method` at `self.prefix() + pattern`
    pub fn add_route<H: Handler>(&self, method: Method, pattern: &str, handler: H) {
        let mut state = self.engine.write();
        let full = format!("{}{}", state.group(self.id).prefix, pattern);
        info!(method = %method, pattern = %full, "Route registered");
        state.router.add_route(method, &full, handler_func(handler));
    }

    pub fn get<H: Handler>(&self, pattern: &str, handler: H) {
        self.add_route(Method::GET, pattern, handler);
    }

    pub fn post<H: Handler>(&self, pattern: &str, handler: H) {
        self.add_route(Method::POST, pattern, handler);
    }

    pub fn put<H: Handler>(&self, pattern: &str, handler: H) {
        self.add_route(Method::PUT, pattern, handler);
    }

    pub fn delete<H: Handler>(&self, pattern: &str, handler: H) {
        self.add_route(Method::DELETE, pattern, handler);
    }

    pub fn patch<H: Handler>(&self, pattern: &str, handler: H) {
        self.add_route(Method::PATCH, pattern, handler);
    }
}

impl std::fmt::Debug for RouterGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterGroup")
            .field("id", &self.id)
            .field("prefix", &self.prefix())
            .finish()
    }
}
