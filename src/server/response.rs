use dashmap::DashMap;
use may_minihttp::Response as RawResponse;
use once_cell::sync::Lazy;
use tracing::warn;

use crate::context::Response;

/// Upper bound on distinct header lines kept for the process lifetime
pub const MAX_INTERNED_HEADER_LINES: usize = 4096;

/// Most headers written on one response
pub const MAX_RESPONSE_HEADERS: usize = 16;

/// `may_minihttp` only accepts `&'static str` header lines, so every
/// distinct `Name: value` line is leaked once and reused afterwards.
static HEADER_LINES: Lazy<DashMap<String, &'static str>> = Lazy::new(DashMap::new);

/// Reason phrase for a status code
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    match status {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        413 => "Payload Too Large",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

/// Static `Name: value` line for a header, or `None` when it cannot be sent.
///
/// Lines containing CR or LF are refused. Once the interner is full,
/// previously unseen lines are refused too.
pub(crate) fn static_header_line(name: &str, value: &str) -> Option<&'static str> {
    if name.contains(['\r', '\n']) || value.contains(['\r', '\n']) {
        warn!(header = %name, "Dropping header containing line breaks");
        return None;
    }

    let line = format!("{name}: {value}");
    if let Some(interned) = HEADER_LINES.get(&line) {
        return Some(*interned);
    }
    if HEADER_LINES.len() >= MAX_INTERNED_HEADER_LINES {
        warn!(
            header = %name,
            limit = MAX_INTERNED_HEADER_LINES,
            "Header line cache full, dropping header"
        );
        return None;
    }
    let leaked: &'static str = Box::leak(line.clone().into_boxed_str());
    Some(*HEADER_LINES.entry(line).or_insert(leaked))
}

/// Write a buffered [`Response`] onto the transport's response
pub fn write_response(res: &mut RawResponse, response: Response) {
    let (status, headers, body) = response.into_parts();
    res.status_code(usize::from(status), status_reason(status));

    if headers.len() > MAX_RESPONSE_HEADERS {
        warn!(
            header_count = headers.len(),
            limit = MAX_RESPONSE_HEADERS,
            "Too many response headers, extra headers dropped"
        );
    }
    for (name, value) in headers.iter().take(MAX_RESPONSE_HEADERS) {
        if let Some(line) = static_header_line(name, value) {
            res.header(line);
        }
    }
    res.body_vec(body);
}

/// Plain-text response for requests that never reached the engine
pub fn write_plain_error(res: &mut RawResponse, status: u16, message: &'static str) {
    res.status_code(usize::from(status), status_reason(status));
    res.header("Content-Type: text/plain");
    res.body(message);
}
