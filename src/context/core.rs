//! Per-request context and the chain executor.
//!
//! A [`Context`] carries one request through its handler chain. The chain
//! is the list of middleware resolved from the engine's groups followed by
//! a single terminal handler (the matched route or the not-found handler).
//!
//! ## Cursor protocol
//!
//! The cursor starts before the first entry. [`Context::next`] advances it
//! and runs the entry it lands on. Middleware call `next()` from inside
//! their own body, so the chain nests on the call stack:
//!
//! ```text
//! recovery ─┐ pre
//!           logger ─┐ pre
//!                   auth ─┐ pre
//!                         handler
//!                   auth ─┘ post
//!           logger ─┘ post
//! recovery ─┘ post
//! ```
//!
//! An entry that returns without calling `next()` ends the chain: nothing
//! after it runs, and later `next()` calls from outer middleware are no-ops.
//! [`Context::fail`] ends the chain the same way and writes a JSON error.

use http::Method;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::handler::HandlerFunc;
use super::request::Request;
use super::response::Response;
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::router::{insert_param, ParamVec};

/// Cursor value before the first chain entry has run
const BEFORE_FIRST: isize = -1;

/// State of one request while it runs through its chain
pub struct Context {
    request_id: RequestId,
    method: Method,
    path: String,
    params: ParamVec,
    request: Request,
    response: Response,
    handlers: Vec<HandlerFunc>,
    index: isize,
}

impl Context {
    /// Create a context for `request` with an empty chain.
    ///
    /// The request id is taken from a valid `x-request-id` header, or
    /// generated.
    #[must_use]
    pub fn new(request: Request) -> Self {
        let request_id = RequestId::from_header_or_new(
            request.headers.get(REQUEST_ID_HEADER).map(String::as_str),
        );
        Self {
            request_id,
            method: request.method.clone(),
            path: request.path.clone(),
            params: ParamVec::new(),
            request,
            response: Response::new(),
            handlers: Vec::new(),
            index: BEFORE_FIRST,
        }
    }

    #[inline]
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The untouched inbound request
    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    // ---- chain -------------------------------------------------------------

    /// Append entries to the end of the chain
    pub fn push_handlers(&mut self, handlers: impl IntoIterator<Item = HandlerFunc>) {
        self.handlers.extend(handlers);
    }

    /// Number of entries in the chain
    #[must_use]
    pub fn chain_len(&self) -> usize {
        self.handlers.len()
    }

    /// Run the next chain entry.
    ///
    /// If the entry returns without calling `next()` itself, the chain is
    /// ended: the cursor moves to the end so no later entry ever runs.
    /// Calling `next()` again once the chain has completed does nothing.
    pub fn next(&mut self) {
        self.index += 1;
        let Some(handler) = self.current_handler() else {
            return;
        };
        let entered = self.index;
        handler.call(self);
        if self.index == entered {
            self.abort();
        }
    }

    /// Stop the chain without writing anything
    pub fn abort(&mut self) {
        self.index = self.end_index();
    }

    /// Whether the cursor has reached the end of the chain
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.index >= self.end_index()
    }

    /// Stop the chain and respond with `{"message": message}`.
    pub fn fail(&mut self, code: u16, message: &str) {
        self.abort();
        debug!(
            request_id = %self.request_id,
            status = code,
            message = %message,
            "Request chain failed"
        );
        self.json(code, &serde_json::json!({ "message": message }));
    }

    fn current_handler(&self) -> Option<HandlerFunc> {
        usize::try_from(self.index)
            .ok()
            .and_then(|i| self.handlers.get(i))
            .map(Arc::clone)
    }

    fn end_index(&self) -> isize {
        isize::try_from(self.handlers.len()).unwrap_or(isize::MAX)
    }

    // ---- request accessors -------------------------------------------------

    /// Get a path parameter by name, or `""` when absent
    #[must_use]
    pub fn param(&self, key: &str) -> &str {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == key)
            .map_or("", |(_, v)| v.as_str())
    }

    #[must_use]
    pub fn params(&self) -> &ParamVec {
        &self.params
    }

    /// Bind a path parameter, replacing any earlier value for `key`
    pub fn set_param(&mut self, key: &str, value: impl Into<String>) {
        insert_param(&mut self.params, key, value.into());
    }

    pub(crate) fn set_params(&mut self, params: ParamVec) {
        self.params = params;
    }

    /// Query string value, or `""` when absent
    #[must_use]
    pub fn query(&self, key: &str) -> &str {
        self.request.query.get(key).map_or("", String::as_str)
    }

    /// Form body value, or `""` when absent
    #[must_use]
    pub fn post_form(&self, key: &str) -> &str {
        self.request.form.get(key).map_or("", String::as_str)
    }

    /// Request header (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    // ---- response writers --------------------------------------------------

    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    #[must_use]
    pub fn into_response(self) -> Response {
        self.response
    }

    /// Response status written so far (200 until a handler sets one)
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.response.status()
    }

    /// Discard the status, headers and body written so far
    pub fn reset_response(&mut self) {
        self.response.clear();
    }

    pub fn status(&mut self, code: u16) {
        self.response.set_status(code);
    }

    /// Add or replace a response header.
    ///
    /// Over HTTP, each distinct `Name: value` line is cached for the life
    /// of the process, up to 4096 lines. Once that cache is full, lines it
    /// has not seen before are dropped with a warning. Per-request values
    /// such as redirect `Location` headers count toward the limit, so keep
    /// header values drawn from a small set where possible.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.response.set_header(name, value);
    }

    /// Write a `text/plain` body
    pub fn string(&mut self, code: u16, body: impl AsRef<str>) {
        self.set_header("Content-Type", "text/plain");
        self.status(code);
        self.response.write(body.as_ref().as_bytes());
    }

    /// Serialize `value` as an `application/json` body.
    ///
    /// If serialization fails the response becomes a 500 carrying the
    /// serializer's error text.
    pub fn json<T: Serialize + ?Sized>(&mut self, code: u16, value: &T) {
        self.set_header("Content-Type", "application/json");
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.status(code);
                self.response.write(&bytes);
            }
            Err(e) => {
                warn!(
                    request_id = %self.request_id,
                    error = %e,
                    "JSON response serialization failed"
                );
                self.set_header("Content-Type", "text/plain");
                self.status(500);
                self.response.write(e.to_string().as_bytes());
            }
        }
    }

    /// Write raw bytes
    pub fn data(&mut self, code: u16, bytes: &[u8]) {
        self.status(code);
        self.response.write(bytes);
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("request_id", &self.request_id)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("status", &self.response.status())
            .field("chain_len", &self.handlers.len())
            .field("cursor", &self.index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::handler_func;
    use std::sync::Mutex;

    fn ctx() -> Context {
        Context::new(Request::new(Method::GET, "/x"))
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &'static str, forward: bool) -> HandlerFunc {
        let log = Arc::clone(log);
        handler_func(move |c: &mut Context| {
            log.lock().unwrap().push(format!("{name}:pre"));
            if forward {
                c.next();
            }
            log.lock().unwrap().push(format!("{name}:post"));
        })
    }

    #[test]
    fn test_next_nests_pre_and_post_logic() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut c = ctx();
        c.push_handlers([
            recorder(&log, "a", true),
            recorder(&log, "b", true),
            recorder(&log, "h", false),
        ]);
        c.next();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:pre", "b:pre", "h:pre", "h:post", "b:post", "a:post"]
        );
        assert!(c.is_aborted());
    }

    #[test]
    fn test_entry_without_next_ends_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut c = ctx();
        c.push_handlers([
            recorder(&log, "a", true),
            recorder(&log, "stop", false),
            recorder(&log, "h", false),
        ]);
        c.next();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:pre", "stop:pre", "stop:post", "a:post"]
        );
    }

    #[test]
    fn test_double_next_does_not_rerun() {
        let count = Arc::new(Mutex::new(0));
        let counted = Arc::clone(&count);
        let mut c = ctx();
        c.push_handlers([
            handler_func(|c: &mut Context| {
                c.next();
                c.next();
            }),
            handler_func(move |_: &mut Context| *counted.lock().unwrap() += 1),
        ]);
        c.next();
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_next_on_empty_chain_is_noop() {
        let mut c = ctx();
        c.next();
        c.next();
        assert!(c.is_aborted());
        assert_eq!(c.status_code(), 200);
    }

    #[test]
    fn test_fail_writes_message_and_stops() {
        let mut c = ctx();
        c.push_handlers([
            handler_func(|c: &mut Context| c.fail(403, "forbidden")),
            handler_func(|c: &mut Context| c.string(200, "unreachable")),
        ]);
        c.next();
        let res = c.into_response();
        assert_eq!(res.status(), 403);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(res.body_string(), r#"{"message":"forbidden"}"#);
    }

    #[test]
    fn test_params_last_write_wins() {
        let mut c = ctx();
        c.set_param("id", "1");
        c.set_param("id", "2");
        assert_eq!(c.param("id"), "2");
        assert_eq!(c.params().len(), 1);
        assert_eq!(c.param("missing"), "");
    }

    #[test]
    fn test_request_accessors() {
        let c = Context::new(
            Request::new(Method::POST, "/login")
                .with_query("next", "/home")
                .with_form("username", "yra")
                .with_header("X-Token", "abc"),
        );
        assert_eq!(c.query("next"), "/home");
        assert_eq!(c.post_form("username"), "yra");
        assert_eq!(c.header("x-token"), Some("abc"));
        assert_eq!(c.header("X-TOKEN"), Some("abc"));
        assert_eq!(c.method(), &Method::POST);
    }

    #[test]
    fn test_request_id_from_header() {
        let id = RequestId::new();
        let c = Context::new(
            Request::new(Method::GET, "/").with_header("x-request-id", &id.to_string()),
        );
        assert_eq!(c.request_id(), id);
    }
}
