use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::context::{Context, Handler};

/// Middleware collecting request counters
///
/// Clones share the same atomic counters: register one clone with the
/// engine and keep another to read or render the numbers.
///
/// Metrics collected:
/// - Total request count
/// - Total and average latency of the downstream chain
/// - Number of responses with a 5xx status
/// - Coroutine stack size seen while serving
#[derive(Clone, Default)]
pub struct MetricsMiddleware {
    counters: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    server_errors: AtomicUsize,
    stack_size: AtomicUsize,
}

impl MetricsMiddleware {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.counters.request_count.load(Ordering::Relaxed)
    }

    /// Number of requests answered with a 5xx status
    #[must_use]
    pub fn server_errors(&self) -> usize {
        self.counters.server_errors.load(Ordering::Relaxed)
    }

    /// Mean downstream latency; zero before the first request
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.counters.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.counters.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Stack size of the last coroutine that served a request
    #[must_use]
    pub fn stack_size(&self) -> usize {
        self.counters.stack_size.load(Ordering::Relaxed)
    }

    /// Render the counters in Prometheus text exposition format
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "# HELP treeroute_requests_total Total requests handled\n\
             # TYPE treeroute_requests_total counter\n\
             treeroute_requests_total {}\n\
             # HELP treeroute_server_errors_total Responses with a 5xx status\n\
             # TYPE treeroute_server_errors_total counter\n\
             treeroute_server_errors_total {}\n\
             # HELP treeroute_request_latency_seconds Average request latency\n\
             # TYPE treeroute_request_latency_seconds gauge\n\
             treeroute_request_latency_seconds {:.6}\n\
             # HELP treeroute_coroutine_stack_bytes Coroutine stack size\n\
             # TYPE treeroute_coroutine_stack_bytes gauge\n\
             treeroute_coroutine_stack_bytes {}\n",
            self.request_count(),
            self.server_errors(),
            self.average_latency().as_secs_f64(),
            self.stack_size(),
        )
    }

    fn record(&self, status: u16, latency: Duration) {
        self.counters.request_count.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.counters.total_latency_ns.fetch_add(nanos, Ordering::Relaxed);
        if status >= 500 {
            self.counters.server_errors.fetch_add(1, Ordering::Relaxed);
        }
        let stack = if may::coroutine::is_coroutine() {
            may::coroutine::current().stack_size()
        } else {
            may::config().get_stack_size()
        };
        self.counters.stack_size.store(stack, Ordering::Relaxed);
    }
}

/// Times the rest of the chain and records its outcome.
///
/// Never short-circuits: requests always proceed downstream. A panic
/// downstream is counted as a 500 and then re-raised for an outer
/// `recovery()` to answer.
impl Handler for MetricsMiddleware {
    fn call(&self, ctx: &mut Context) {
        let start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| ctx.next()));
        let status = if outcome.is_err() { 500 } else { ctx.status_code() };
        self.record(status, start.elapsed());
        if let Err(panic) = outcome {
            resume_unwind(panic);
        }
    }
}
