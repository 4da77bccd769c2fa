use http::Method;
use treeroute::context::handler_func;
use treeroute::router::{parse_parts, Router};
use treeroute::{Context, Request};

fn tag(name: &'static str) -> treeroute::HandlerFunc {
    handler_func(move |ctx: &mut Context| ctx.string(200, name))
}

fn assert_route_match(router: &Router, method: Method, path: &str, expected_pattern: &str) {
    let m = router
        .get_route(&method, path)
        .unwrap_or_else(|| panic!("expected {method} {path} to match {expected_pattern}"));
    assert_eq!(&*m.pattern, expected_pattern, "{method} {path}");
}

fn assert_no_match(router: &Router, method: Method, path: &str) {
    assert!(
        router.get_route(&method, path).is_none(),
        "expected {method} {path} not to match"
    );
}

fn body(router: &Router, method: Method, path: &str) -> (u16, String) {
    let mut ctx = Context::new(Request::new(method, path));
    router.handle(&mut ctx);
    let res = ctx.into_response();
    (res.status(), res.body_string())
}

fn zoo() -> Router {
    let mut r = Router::new();
    r.add_route(Method::GET, "/", tag("root"));
    r.add_route(Method::GET, "/hello", tag("hello"));
    r.add_route(Method::GET, "/hello/:name", tag("hello_name"));
    r.add_route(Method::GET, "/hello/b/c", tag("hello_b_c"));
    r.add_route(Method::GET, "/hi/:name", tag("hi_name"));
    r.add_route(Method::GET, "/assets/*filepath", tag("assets"));
    r.add_route(Method::POST, "/zoo/animals", tag("create"));
    r.add_route(Method::PUT, "/zoo/animals/:id", tag("update"));
    r.add_route(Method::DELETE, "/zoo/animals/:id", tag("delete"));
    r
}

#[test]
fn test_parse_parts() {
    assert_eq!(parse_parts("/"), Vec::<&str>::new());
    assert_eq!(parse_parts("/p/:name"), vec!["p", ":name"]);
    assert_eq!(parse_parts("/p/*"), vec!["p", "*"]);
    assert_eq!(parse_parts("/p/*name/*"), vec!["p", "*name"]);
    assert_eq!(parse_parts("//a///b/"), vec!["a", "b"]);
}

#[test]
fn test_root_and_literals() {
    let r = zoo();
    assert_route_match(&r, Method::GET, "/", "/");
    assert_route_match(&r, Method::GET, "/hello", "/hello");
    assert_route_match(&r, Method::GET, "/hello/", "/hello");
    assert_route_match(&r, Method::GET, "//hello//", "/hello");
}

#[test]
fn test_param_route() {
    let r = zoo();
    let m = r.get_route(&Method::GET, "/hello/geektutu").unwrap();
    assert_eq!(&*m.pattern, "/hello/:name");
    assert_eq!(m.get_param("name"), Some("geektutu"));
    assert_eq!(m.params_map().len(), 1);
}

#[test]
fn test_scaffolding_nodes_do_not_match() {
    let r = zoo();
    // `/hello/b` exists only as a node on the way to `/hello/b/c`; the
    // earlier-registered `:name` child answers it instead
    assert_route_match(&r, Method::GET, "/hello/b", "/hello/:name");
    assert_route_match(&r, Method::GET, "/hello/b/c", "/hello/b/c");
    assert_no_match(&r, Method::GET, "/hello/x/c");
    assert_no_match(&r, Method::GET, "/zoo");
}

#[test]
fn test_catch_all_route() {
    let r = zoo();
    let m = r.get_route(&Method::GET, "/assets/css/geektutu.css").unwrap();
    assert_eq!(&*m.pattern, "/assets/*filepath");
    assert_eq!(m.get_param("filepath"), Some("css/geektutu.css"));
}

#[test]
fn test_catch_all_requires_a_segment() {
    let r = zoo();
    assert_no_match(&r, Method::GET, "/assets");
    assert_no_match(&r, Method::GET, "/assets/");
}

#[test]
fn test_literal_registered_first_wins() {
    let mut r = Router::new();
    r.add_route(Method::GET, "/users/me", tag("me"));
    r.add_route(Method::GET, "/users/:id", tag("by_id"));
    assert_route_match(&r, Method::GET, "/users/me", "/users/me");
    assert_route_match(&r, Method::GET, "/users/42", "/users/:id");
}

#[test]
fn test_param_registered_first_shadows_literal() {
    let mut r = Router::new();
    r.add_route(Method::GET, "/users/:id", tag("by_id"));
    r.add_route(Method::GET, "/users/me", tag("me"));
    assert_route_match(&r, Method::GET, "/users/me", "/users/:id");
}

#[test]
fn test_backtracks_when_param_branch_fails_deeper() {
    let mut r = Router::new();
    r.add_route(Method::GET, "/files/:id/meta", tag("meta"));
    r.add_route(Method::GET, "/files/latest", tag("latest"));
    assert_route_match(&r, Method::GET, "/files/latest", "/files/latest");
    assert_route_match(&r, Method::GET, "/files/7/meta", "/files/:id/meta");
}

#[test]
fn test_distinct_param_names_bind_their_own_name() {
    let mut r = Router::new();
    r.add_route(Method::GET, "/p/:lang/doc", tag("doc"));
    r.add_route(Method::GET, "/p/:user/profile", tag("profile"));

    let doc = r.get_route(&Method::GET, "/p/go/doc").unwrap();
    assert_eq!(doc.get_param("lang"), Some("go"));
    assert!(doc.get_param("user").is_none());

    let profile = r.get_route(&Method::GET, "/p/yra/profile").unwrap();
    assert_eq!(&*profile.pattern, "/p/:user/profile");
    assert_eq!(profile.get_param("user"), Some("yra"));
    assert!(profile.get_param("lang").is_none());
}

#[test]
fn test_methods_are_isolated() {
    let r = zoo();
    assert_route_match(&r, Method::POST, "/zoo/animals", "/zoo/animals");
    assert_route_match(&r, Method::PUT, "/zoo/animals/3", "/zoo/animals/:id");
    assert_route_match(&r, Method::DELETE, "/zoo/animals/3", "/zoo/animals/:id");
    assert_no_match(&r, Method::GET, "/zoo/animals");
    assert_no_match(&r, Method::PATCH, "/zoo/animals/3");
}

#[test]
fn test_handle_runs_matched_handler() {
    let r = zoo();
    assert_eq!(body(&r, Method::GET, "/hi/yra"), (200, "hi_name".to_string()));
    assert_eq!(body(&r, Method::GET, "/"), (200, "root".to_string()));
}

#[test]
fn test_handle_unmatched_is_404() {
    let r = zoo();
    assert_eq!(
        body(&r, Method::GET, "/nowhere/at/all"),
        (404, "404 NOT FOUND: /nowhere/at/all\n".to_string())
    );
    assert_eq!(
        body(&r, Method::PATCH, "/zoo/animals/1"),
        (404, "404 NOT FOUND: /zoo/animals/1\n".to_string())
    );
}

#[test]
fn test_routes_listing() {
    let r = zoo();
    assert_eq!(r.len(), 9);
    assert!(!r.is_empty());
    let listed: Vec<String> = r
        .routes()
        .into_iter()
        .map(|(m, p)| format!("{m} {p}"))
        .collect();
    assert_eq!(listed.first().map(String::as_str), Some("DELETE /zoo/animals/:id"));
    assert!(listed.contains(&"GET /assets/*filepath".to_string()));
}
