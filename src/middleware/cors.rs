use http::Method;

use crate::context::{Context, Handler};

/// CORS (Cross-Origin Resource Sharing) middleware
///
/// Answers preflight `OPTIONS` requests itself and adds CORS headers to
/// every other response. Configurable with allowed origins, headers, and
/// methods.
#[derive(Debug, Clone)]
pub struct CorsMiddleware {
    allowed_origins: Vec<String>,
    allowed_headers: Vec<String>,
    allowed_methods: Vec<Method>,
}

impl CorsMiddleware {
    /// Create a CORS middleware with a specific policy
    ///
    /// ```rust
    /// use http::Method;
    /// use treeroute::middleware::CorsMiddleware;
    ///
    /// let cors = CorsMiddleware::new(
    ///     vec!["https://example.com".to_string()],
    ///     vec!["Content-Type".to_string()],
    ///     vec![Method::GET, Method::POST],
    /// );
    /// ```
    #[must_use]
    pub fn new(
        allowed_origins: Vec<String>,
        allowed_headers: Vec<String>,
        allowed_methods: Vec<Method>,
    ) -> Self {
        Self {
            allowed_origins,
            allowed_headers,
            allowed_methods,
        }
    }

    fn apply_headers(&self, ctx: &mut Context) {
        ctx.set_header("Access-Control-Allow-Origin", self.allowed_origins.join(", "));
        ctx.set_header("Access-Control-Allow-Headers", self.allowed_headers.join(", "));
        let methods = self
            .allowed_methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        ctx.set_header("Access-Control-Allow-Methods", methods);
    }
}

/// Permissive policy: any origin, common headers and methods
impl Default for CorsMiddleware {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".into()],
            allowed_headers: vec!["Content-Type".into(), "Authorization".into()],
            allowed_methods: vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::PATCH,
                Method::OPTIONS,
            ],
        }
    }
}

/// # CORS flow
///
/// 1. **Preflight (OPTIONS)**: 204 with CORS headers; the chain stops here
/// 2. **Actual request**: the chain runs, then CORS headers are added
impl Handler for CorsMiddleware {
    fn call(&self, ctx: &mut Context) {
        if *ctx.method() == Method::OPTIONS {
            ctx.status(204);
            self.apply_headers(ctx);
            return;
        }
        ctx.next();
        self.apply_headers(ctx);
    }
}
