use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::error;

use crate::context::Context;

/// Message written to the client when a handler panics
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Middleware that turns a panic anywhere downstream into a 500.
///
/// The rest of the chain runs inside `catch_unwind`. A panic raised by
/// an inner handler, or by an inner middleware after its own `next()`
/// returned, is logged with a backtrace. Whatever was written before the
/// panic is discarded and the response becomes
/// `{"message":"Internal Server Error"}`. Register it first so it wraps
/// everything else.
pub fn recovery() -> impl Fn(&mut Context) + Send + Sync + 'static {
    |ctx: &mut Context| {
        let outcome = catch_unwind(AssertUnwindSafe(|| ctx.next()));
        if let Err(panic) = outcome {
            let panic_message = panic_message(panic.as_ref());
            let backtrace = Backtrace::force_capture();
            error!(
                request_id = %ctx.request_id(),
                method = %ctx.method(),
                path = %ctx.path(),
                panic_message = %panic_message,
                backtrace = %backtrace,
                "Handler panicked - recovered"
            );
            ctx.reset_response();
            ctx.fail(500, INTERNAL_SERVER_ERROR);
        }
    }
}
