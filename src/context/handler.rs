use std::sync::Arc;

use super::Context;

/// A single entry of a request chain.
///
/// Middleware and terminal handlers share this trait: both receive the
/// request's [`Context`] and decide whether to hand off to the rest of the
/// chain via [`Context::next`]. Any `Fn(&mut Context)` closure is a handler.
///
/// ```
/// use treeroute::{Context, Handler};
///
/// fn hello(ctx: &mut Context) {
///     ctx.string(200, "hello");
/// }
///
/// fn assert_handler<H: Handler>(_: H) {}
/// assert_handler(hello);
/// assert_handler(|ctx: &mut Context| ctx.next());
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: &mut Context);
}

impl<F> Handler for F
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    #[inline]
    fn call(&self, ctx: &mut Context) {
        self(ctx)
    }
}

/// Shared, type-erased handler as stored in route tables and chains
pub type HandlerFunc = Arc<dyn Handler>;

/// Erase a handler into a [`HandlerFunc`]
pub fn handler_func<H: Handler>(handler: H) -> HandlerFunc {
    Arc::new(handler)
}
