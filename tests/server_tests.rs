use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::time::Duration;
use treeroute::middleware::CorsMiddleware;
use treeroute::server::{EngineService, HttpServer, ServerHandle};
use treeroute::{Context, Engine};

fn free_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn start_server() -> (ServerHandle, SocketAddr) {
    may::config().set_stack_size(0x10000);

    let engine = Engine::with_defaults();
    engine.get("/hello", |ctx: &mut Context| {
        let body = format!("hello {}", ctx.query("name"));
        ctx.string(200, body);
    });
    engine.get("/hello/:name", |ctx: &mut Context| {
        let body = format!("hello {}", ctx.param("name"));
        ctx.string(200, body);
    });
    engine.get("/assets/*filepath", |ctx: &mut Context| {
        let filepath = ctx.param("filepath").to_string();
        ctx.json(200, &serde_json::json!({ "filepath": filepath }));
    });
    engine.post("/login", |ctx: &mut Context| {
        let body = format!("{}/{}", ctx.post_form("username"), ctx.post_form("password"));
        ctx.string(200, body);
    });
    engine.get("/slow", |ctx: &mut Context| {
        may::coroutine::sleep(Duration::from_millis(100));
        ctx.string(200, "slow done");
    });
    engine.get("/panic", |ctx: &mut Context| {
        let names: Vec<&str> = Vec::new();
        ctx.string(200, names[3]);
    });
    engine
        .group("/cors")
        .use_middleware(CorsMiddleware::default())
        .get("/items", |ctx: &mut Context| ctx.string(200, "[]"));

    let service = EngineService::new(engine);
    assert!(service.engine().routes().len() >= 7);

    let addr = free_addr();
    let handle = HttpServer(service).start(addr).unwrap();
    handle.wait_ready().unwrap();
    (handle, addr)
}

fn send_request(addr: &SocketAddr, req: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(req.as_bytes()).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_millis(200)))
        .unwrap();
    let mut buf = Vec::new();
    loop {
        let mut tmp = [0u8; 1024];
        match stream.read(&mut tmp) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                break
            }
            Err(e) => panic!("read error: {e:?}"),
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Split a raw response into `(status, lowercase header lines, body)`
fn parse_response(resp: &str) -> (u16, Vec<String>, String) {
    let (head, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
    let mut lines = head.lines();
    let status = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let headers = lines.map(str::to_ascii_lowercase).collect();
    (status, headers, body.to_string())
}

fn get(addr: &SocketAddr, target: &str) -> (u16, Vec<String>, String) {
    let req = format!("GET {target} HTTP/1.1\r\nHost: localhost\r\n\r\n");
    parse_response(&send_request(addr, &req))
}

#[test]
fn test_param_route_over_http() {
    let (handle, addr) = start_server();
    let (status, headers, body) = get(&addr, "/hello/geektutu");
    handle.stop();

    assert_eq!(status, 200);
    assert!(headers.iter().any(|h| h == "content-type: text/plain"));
    assert_eq!(body, "hello geektutu");
}

#[test]
fn test_query_string_is_split_from_path() {
    let (handle, addr) = start_server();
    let (status, _, body) = get(&addr, "/hello?name=yra%20x");
    handle.stop();

    assert_eq!(status, 200);
    assert_eq!(body, "hello yra x");
}

#[test]
fn test_catch_all_over_http() {
    let (handle, addr) = start_server();
    let (status, headers, body) = get(&addr, "/assets/css/site.css");
    handle.stop();

    assert_eq!(status, 200);
    assert!(headers.iter().any(|h| h == "content-type: application/json"));
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["filepath"], "css/site.css");
}

#[test]
fn test_form_post_over_http() {
    let (handle, addr) = start_server();
    let form = "username=yra&password=p%40ss";
    let req = format!(
        "POST /login HTTP/1.1\r\nHost: localhost\r\n\
         Content-Type: application/x-www-form-urlencoded\r\n\
         Content-Length: {}\r\n\r\n{form}",
        form.len()
    );
    let (status, _, body) = parse_response(&send_request(&addr, &req));
    handle.stop();

    assert_eq!(status, 200);
    assert_eq!(body, "yra/p@ss");
}

#[test]
fn test_not_found_over_http() {
    let (handle, addr) = start_server();
    let (status, _, body) = get(&addr, "/nowhere");
    handle.stop();

    assert_eq!(status, 404);
    assert_eq!(body, "404 NOT FOUND: /nowhere\n");
}

#[test]
fn test_panic_is_recovered_over_http() {
    let (handle, addr) = start_server();
    let (status, _, body) = get(&addr, "/panic");
    // The server keeps serving after a recovered panic
    let (after, _, _) = get(&addr, "/hello/again");
    handle.stop();

    assert_eq!(status, 500);
    assert_eq!(body, r#"{"message":"Internal Server Error"}"#);
    assert_eq!(after, 200);
}

#[test]
fn test_panic_does_not_disturb_in_flight_request() {
    let (handle, addr) = start_server();
    let slow = std::thread::spawn(move || get(&addr, "/slow"));
    std::thread::sleep(Duration::from_millis(20));
    let (panic_status, _, _) = get(&addr, "/panic");
    let (slow_status, _, slow_body) = slow.join().unwrap();
    handle.stop();

    assert_eq!(panic_status, 500);
    assert_eq!(slow_status, 200);
    assert_eq!(slow_body, "slow done");
}

#[test]
fn test_cors_headers_over_http() {
    let (handle, addr) = start_server();
    let (status, headers, _) = get(&addr, "/cors/items");
    let preflight = send_request(
        &addr,
        "OPTIONS /cors/items HTTP/1.1\r\nHost: localhost\r\n\r\n",
    );
    handle.stop();

    assert_eq!(status, 200);
    assert!(headers
        .iter()
        .any(|h| h == "access-control-allow-origin: *"));
    let (pre_status, pre_headers, _) = parse_response(&preflight);
    assert_eq!(pre_status, 204);
    assert!(pre_headers
        .iter()
        .any(|h| h.starts_with("access-control-allow-methods:")));
}
