use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::time::Instant;
use tracing::{info, info_span};

use crate::context::Context;

/// Middleware that logs one line per request once the rest of the chain
/// has finished.
///
/// Downstream work runs inside a `request` span carrying the request id,
/// so events emitted by inner handlers are correlated with it. A panic
/// downstream is logged with status 500 and `panicked = true` before it
/// is re-raised.
pub fn logger() -> impl Fn(&mut Context) + Send + Sync + 'static {
    |ctx: &mut Context| {
        let start = Instant::now();
        let span = info_span!(
            "request",
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path()
        );
        let outcome = catch_unwind(AssertUnwindSafe(|| span.in_scope(|| ctx.next())));

        let panicked = outcome.is_err();
        let status = if panicked { 500 } else { ctx.status_code() };
        let latency_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        info!(
            request_id = %ctx.request_id(),
            status,
            method = %ctx.method(),
            path = %ctx.path(),
            latency_us,
            panicked,
            "Request completed"
        );

        if let Err(panic) = outcome {
            resume_unwind(panic);
        }
    }
}
