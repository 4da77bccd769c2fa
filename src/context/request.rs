use http::Method;
use std::collections::HashMap;

/// Transport-independent view of an inbound request.
///
/// The server adapter builds one of these from the raw HTTP request; tests
/// build them directly. The dispatch core only reads `method` and `path`,
/// everything else is handed through to handlers untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Decoded query string parameters
    pub query: HashMap<String, String>,
    /// Decoded `application/x-www-form-urlencoded` body fields
    pub form: HashMap<String, String>,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Raw request body
    pub body: Vec<u8>,
}

impl Request {
    /// Create a request with no query, form, headers or body
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            form: HashMap::new(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_form(mut self, key: &str, value: &str) -> Self {
        self.form.insert(key.to_string(), value.to_string());
        self
    }

    /// Add a header; the name is stored lowercase
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}
