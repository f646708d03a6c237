use rampart::http::request::{Method, Request};
use rampart::router::{AppRoute, Handler, Router, best_match, resolve};
use std::collections::HashMap;

fn request(method: Method, url: &str) -> Request {
    let mut req = Request::new();
    req.method = method;
    req.url = url.to_string();
    req.path = match url.split_once('?') {
        Some((path, _)) => path.to_string(),
        None => url.to_string(),
    };
    req
}

fn app_handler(handler: &Handler) -> &AppRoute {
    match handler {
        Handler::App(route) => route,
        other => panic!("expected app handler, got {:?}", other),
    }
}

#[test]
fn test_mount_point_is_normalized() {
    let router = Router::mvc("/app");
    assert_eq!(router.mount_point(), "/app/");

    let mut router = Router::mvc("/app/");
    assert_eq!(router.mount_point(), "/app/");
    router.set_mount_point("/other");
    assert_eq!(router.mount_point(), "/other/");
}

#[test]
fn test_best_match_picks_highest_score() {
    let routers = vec![
        Router::static_files("/static", "./public"),
        Router::mvc("/"),
    ];

    let best = best_match(&routers, "/static/app.css").unwrap();
    assert_eq!(best, 0);

    let best = best_match(&routers, "/blog/show").unwrap();
    assert_eq!(best, 1);
}

#[test]
fn test_best_match_tie_goes_to_later_registration() {
    let routers = vec![Router::mvc("/api"), Router::rest("/api")];
    let best = best_match(&routers, "/api/users").unwrap();
    assert_eq!(best, 1);
}

#[test]
fn test_best_match_skips_custom_routers() {
    let mut routes = HashMap::new();
    routes.insert(
        "/static/secret".to_string(),
        Handler::Redirect("http://example.com/".to_string()),
    );
    let routers = vec![Router::custom(routes), Router::static_files("/static", ".")];

    let best = best_match(&routers, "/static/app.css").unwrap();
    assert_eq!(best, 1);
}

#[test]
fn test_best_match_scoring_does_not_anchor_on_slashes() {
    // "/apple/" scores 3 against "/api/x" even though it is not a path
    // prefix; kept for compatibility.
    let routers = vec![Router::mvc("/apple"), Router::mvc("/")];
    let best = best_match(&routers, "/api/x").unwrap();
    assert_eq!(best, 0);
}

#[test]
fn test_custom_route_overrides_best_match() {
    let mut routes = HashMap::new();
    routes.insert(
        "/static/special".to_string(),
        Handler::Redirect("http://example.com/elsewhere".to_string()),
    );

    let routers = vec![Router::static_files("/static", "."), Router::custom(routes)];
    let req = request(Method::GET, "/static/special");

    let (handler, owner) = resolve(&routers, &req);
    assert_eq!(
        handler,
        Handler::Redirect("http://example.com/elsewhere".to_string())
    );
    assert_eq!(owner, Some(1));
}

#[test]
fn test_custom_route_matches_full_url_including_query() {
    let mut routes = HashMap::new();
    routes.insert(
        "/page?lang=en".to_string(),
        Handler::App(AppRoute::new(".", "pages", "PagesController", "english")),
    );
    let routers = vec![Router::mvc("/"), Router::custom(routes)];

    // The raw URL with the query matches.
    let req = request(Method::GET, "/page?lang=en");
    let (handler, _) = resolve(&routers, &req);
    assert_eq!(app_handler(&handler).action, "english");

    // The bare path does not hit the custom route and falls back to MVC.
    let req = request(Method::GET, "/page");
    let (handler, owner) = resolve(&routers, &req);
    assert_eq!(app_handler(&handler).module, "page");
    assert_eq!(owner, Some(0));
}

#[test]
fn test_no_routers_resolves_to_not_found() {
    let req = request(Method::GET, "/anything");
    let (handler, owner) = resolve(&[], &req);
    assert_eq!(handler, Handler::NotFound);
    assert_eq!(owner, None);
}

#[test]
fn test_static_router_resolution() {
    let routers = vec![Router::static_files("/static", "./public")];
    let req = request(Method::GET, "/static/index.html");

    let (handler, owner) = resolve(&routers, &req);
    assert_eq!(handler, Handler::StaticFile);
    assert_eq!(owner, Some(0));
}

#[test]
fn test_mvc_resolution() {
    let router = Router::mvc("/");
    let req = request(Method::GET, "/blog/show");

    let route = match router.route(&req) {
        Handler::App(route) => route,
        other => panic!("expected app handler, got {:?}", other),
    };
    assert_eq!(route.module, "blog");
    assert_eq!(route.cls, "BlogController");
    assert_eq!(route.action, "show");
}

#[test]
fn test_mvc_defaults() {
    let router = Router::mvc("/");

    let req = request(Method::GET, "/");
    let route = app_handler(&router.route(&req)).clone();
    assert_eq!(route.module, "index");
    assert_eq!(route.cls, "IndexController");
    assert_eq!(route.action, "index");

    let req = request(Method::GET, "/blog");
    let route = app_handler(&router.route(&req)).clone();
    assert_eq!(route.module, "blog");
    assert_eq!(route.cls, "BlogController");
    assert_eq!(route.action, "index");
}

#[test]
fn test_mvc_with_non_root_mount() {
    let router = Router::mvc("/admin");
    let req = request(Method::GET, "/admin/users/list");

    let handler = router.route(&req);
    let route = app_handler(&handler);
    assert_eq!(route.module, "users");
    assert_eq!(route.cls, "UsersController");
    assert_eq!(route.action, "list");
}

#[test]
fn test_mvc_inherits_router_package() {
    let mut router = Router::mvc("/");
    router.set_package("myapp");
    let req = request(Method::GET, "/blog/show");

    let handler = router.route(&req);
    assert_eq!(app_handler(&handler).package, "myapp");
}

#[test]
fn test_rest_get_without_id() {
    let router = Router::rest("/api");
    let req = request(Method::GET, "/api/users");

    let handler = router.route(&req);
    let route = app_handler(&handler);
    assert_eq!(route.module, "users");
    assert_eq!(route.cls, "UsersController");
    assert_eq!(route.action, "get_all");
    assert!(route.args.is_empty());
}

#[test]
fn test_rest_get_with_id() {
    let router = Router::rest("/api");
    let req = request(Method::GET, "/api/users/42");

    let handler = router.route(&req);
    let route = app_handler(&handler);
    assert_eq!(route.action, "get_one");
    assert_eq!(route.args.get("id").unwrap(), "42");
}

#[test]
fn test_rest_post_create() {
    let router = Router::rest("/api");

    let req = request(Method::POST, "/api/users");
    assert_eq!(app_handler(&router.route(&req)).action, "create_one");

    // POST to an item is invalid.
    let req = request(Method::POST, "/api/users/42");
    assert_eq!(router.route(&req), Handler::NotFound);
}

#[test]
fn test_rest_put_update() {
    let router = Router::rest("/api");

    let req = request(Method::PUT, "/api/users/42");
    assert_eq!(app_handler(&router.route(&req)).action, "update_one");

    let req = request(Method::PUT, "/api/users");
    assert_eq!(router.route(&req), Handler::NotFound);
}

#[test]
fn test_rest_delete() {
    let router = Router::rest("/api");

    let req = request(Method::DELETE, "/api/users/42");
    assert_eq!(app_handler(&router.route(&req)).action, "delete_one");

    let req = request(Method::DELETE, "/api/users");
    assert_eq!(router.route(&req), Handler::NotFound);
}

#[test]
fn test_rest_other_methods_are_404() {
    let router = Router::rest("/api");
    let req = request(Method::PATCH, "/api/users/42");
    assert_eq!(router.route(&req), Handler::NotFound);
}

#[test]
fn test_rest_without_resource_is_404() {
    let router = Router::rest("/api");
    let req = request(Method::GET, "/api/");
    assert_eq!(router.route(&req), Handler::NotFound);
}

#[test]
fn test_custom_register_route() {
    let mut router = Router::custom(HashMap::new());
    router.register_route("/ping", Handler::Redirect("http://example.com/pong".into()));

    let req = request(Method::GET, "/ping");
    assert!(matches!(router.route(&req), Handler::Redirect(_)));

    let req = request(Method::GET, "/pong");
    assert_eq!(router.route(&req), Handler::NotFound);
}

#[test]
fn test_handler_validity() {
    assert!(!Handler::NotFound.is_valid());
    assert!(Handler::StaticFile.is_valid());
    assert!(Handler::Redirect("http://example.com/".into()).is_valid());
}
