#![allow(dead_code)]

use http::Method;
use std::io::Write;
use std::sync::{Arc, Mutex};
use treeroute::{Context, Engine, Request, Response};

/// Shared, ordered record of chain events
#[derive(Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Middleware recording `name:pre` / `name:post` around `next()`
    pub fn middleware(&self, name: &'static str) -> impl Fn(&mut Context) + Send + Sync + 'static {
        let trace = self.clone();
        move |ctx: &mut Context| {
            trace.push(format!("{name}:pre"));
            ctx.next();
            trace.push(format!("{name}:post"));
        }
    }

    /// Terminal handler recording `name` and answering with it
    pub fn handler(&self, name: &'static str) -> impl Fn(&mut Context) + Send + Sync + 'static {
        let trace = self.clone();
        move |ctx: &mut Context| {
            trace.push(name);
            ctx.string(200, name);
        }
    }
}

pub fn get(engine: &Engine, path: &str) -> Response {
    engine.handle(Request::new(Method::GET, path))
}

/// `MakeWriter` collecting formatted log output in memory
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Thread-local JSON subscriber writing into a [`LogBuffer`]
pub struct TestLogs {
    pub buffer: LogBuffer,
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestLogs {
    pub fn init() -> Self {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(buffer.clone())
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        Self {
            buffer,
            _guard: guard,
        }
    }

    pub fn contents(&self) -> String {
        self.buffer.contents()
    }
}
