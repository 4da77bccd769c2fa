use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum inline response headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage.
///
/// Header names use `Arc<str>` since they are mostly a handful of
/// well-known names; values are per-request data.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Buffered response produced by running a request chain.
///
/// The status defaults to 200 and the last write wins. Body writes append,
/// the same way successive writes to an HTTP response stream would.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: HeaderVec,
    body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: 200,
            headers: HeaderVec::new(),
            body: Vec::new(),
        }
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderVec {
        &self.headers
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, lossily
    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Append bytes to the body
    pub fn write(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    /// Drop everything written so far and return to the defaults
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Split into `(status, headers, body)` for the transport
    #[must_use]
    pub fn into_parts(self) -> (u16, HeaderVec, Vec<u8>) {
        (self.status, self.headers, self.body)
    }
}
