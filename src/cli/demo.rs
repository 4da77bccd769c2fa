use serde_json::json;

use crate::context::Context;
use crate::engine::Engine;
use crate::middleware::{AuthMiddleware, MetricsMiddleware};

/// Token the demo `/v2/admin` group accepts in `authorization`
pub const DEMO_ADMIN_TOKEN: &str = "Bearer demo-token";

/// Engine with a small route table exercising every pattern kind,
/// nested groups and the bundled middleware.
///
/// | Method | Pattern                    |
/// |--------|----------------------------|
/// | GET    | `/`                        |
/// | GET    | `/hello`                   |
/// | GET    | `/hello/:name`             |
/// | GET    | `/assets/*filepath`        |
/// | GET    | `/panic`                   |
/// | GET    | `/metrics`                 |
/// | GET    | `/v1/hello`                |
/// | POST   | `/v1/login`                |
/// | GET    | `/v2/hello/:name`          |
/// | GET    | `/v2/admin/stats`          |
#[must_use]
pub fn demo_engine() -> Engine {
    let engine = Engine::with_defaults();
    let metrics = MetricsMiddleware::new();
    engine.use_middleware(metrics.clone());

    engine.get("/", |ctx: &mut Context| {
        ctx.set_header("Content-Type", "text/html");
        ctx.data(200, b"<h1>treeroute</h1>");
    });
    engine.get("/hello", |ctx: &mut Context| {
        let body = format!("hello {}, you're at {}\n", ctx.query("name"), ctx.path());
        ctx.string(200, body);
    });
    engine.get("/hello/:name", |ctx: &mut Context| {
        let body = format!("hello {}, you're at {}\n", ctx.param("name"), ctx.path());
        ctx.string(200, body);
    });
    engine.get("/assets/*filepath", |ctx: &mut Context| {
        let filepath = ctx.param("filepath").to_string();
        ctx.json(200, &json!({ "filepath": filepath }));
    });
    engine.get("/panic", |ctx: &mut Context| {
        let names: Vec<&str> = Vec::new();
        // Index out of range, caught by the recovery middleware
        ctx.string(200, names[100]);
    });
    engine.get("/metrics", move |ctx: &mut Context| {
        ctx.string(200, metrics.render());
    });

    let v1 = engine.group("/v1");
    v1.get("/hello", |ctx: &mut Context| {
        let body = format!("hello {}, you're at {}\n", ctx.query("name"), ctx.path());
        ctx.string(200, body);
    });
    v1.post("/login", |ctx: &mut Context| {
        let username = ctx.post_form("username").to_string();
        let password = ctx.post_form("password").to_string();
        ctx.json(200, &json!({ "username": username, "password": password }));
    });

    let v2 = engine.group("/v2");
    v2.use_middleware(|ctx: &mut Context| {
        ctx.set_header("X-Api-Version", "2");
        ctx.next();
    });
    v2.get("/hello/:name", |ctx: &mut Context| {
        let body = format!("hello {}, you're at {}\n", ctx.param("name"), ctx.path());
        ctx.string(200, body);
    });

    let admin = v2.group("/admin");
    admin.use_middleware(AuthMiddleware::new(DEMO_ADMIN_TOKEN));
    admin.get("/stats", |ctx: &mut Context| {
        ctx.json(200, &json!({ "status": "ok" }));
    });

    engine
}
