use http::method::InvalidMethod;
use http::Method;
use may_minihttp::Request as RawRequest;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, warn};

use crate::context::Request;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Split a request target into `(path, query)` at the first `?`
#[must_use]
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

/// Parse query string parameters from a URL path
///
/// Extracts everything after the `?` character and URL-decodes parameter
/// names and values. A repeated key keeps its last value.
///
/// # Arguments
///
/// * `target` - The full request target (e.g., `/users?limit=10&offset=20`)
#[must_use]
pub fn parse_query_params(target: &str) -> HashMap<String, String> {
    match split_target(target).1 {
        Some(query) => url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect(),
        None => HashMap::new(),
    }
}

/// Decode an `application/x-www-form-urlencoded` body.
///
/// Other content types yield an empty map; the raw body stays available
/// on the request either way.
#[must_use]
pub fn parse_form(content_type: Option<&str>, body: &[u8]) -> HashMap<String, String> {
    let is_form = content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE));
    if !is_form || body.is_empty() {
        return HashMap::new();
    }
    url::form_urlencoded::parse(body).into_owned().collect()
}

/// Assemble a [`Request`] from raw transport pieces.
///
/// Header names are lowercased; the path loses its query string.
///
/// # Errors
///
/// Returns an error when `method` is not a valid HTTP method token.
pub fn build_request(
    method: &str,
    target: &str,
    headers: HashMap<String, String>,
    body: Vec<u8>,
) -> Result<Request, InvalidMethod> {
    let method = Method::from_bytes(method.as_bytes())?;
    let (path, _) = split_target(target);
    let path = if path.is_empty() { "/" } else { path };
    let query = parse_query_params(target);
    let form = parse_form(headers.get("content-type").map(String::as_str), &body);

    Ok(Request {
        method,
        path: path.to_string(),
        query,
        form,
        headers,
        body,
    })
}

/// Convert a `may_minihttp` request into a [`Request`].
///
/// The body is read last because reading it consumes the raw request.
///
/// # Errors
///
/// Returns an error when the method token is invalid.
pub fn parse_request(req: RawRequest) -> Result<Request, InvalidMethod> {
    let method = req.method().to_string();
    let target = req.path().to_string();
    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let mut body = Vec::new();
    if let Err(e) = req.body().read_to_end(&mut body) {
        warn!(error = %e, method = %method, path = %target, "Failed to read request body");
        body.clear();
    }

    debug!(
        method = %method,
        target = %target,
        header_count = headers.len(),
        body_size_bytes = body.len(),
        "HTTP request parsed"
    );

    build_request(&method, &target, headers, body)
}
