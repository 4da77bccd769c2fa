use tracing::debug;

use crate::context::{Context, Handler};

/// Static bearer-style token check on the `authorization` header.
///
/// A missing or different header ends the chain with
/// `401 {"message":"Unauthorized"}`.
#[derive(Debug, Clone)]
pub struct AuthMiddleware {
    token: String,
}

impl AuthMiddleware {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Handler for AuthMiddleware {
    fn call(&self, ctx: &mut Context) {
        let presented = ctx.header("authorization");
        if presented == Some(self.token.as_str()) {
            ctx.next();
            return;
        }
        debug!(
            request_id = %ctx.request_id(),
            path = %ctx.path(),
            header_present = presented.is_some(),
            "Authorization rejected"
        );
        ctx.fail(401, "Unauthorized");
    }
}
