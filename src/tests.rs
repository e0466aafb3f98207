//! End-to-end tests driving a `Router` with the middleware installed.

use crate::props::{Invokable, Prop, Props};
use crate::protocol::constants::headers;
use crate::server::{Inertia, InertiaConfig, InertiaLayer, MemoryStore, TemplateRootView};
use crate::types::ValidationErrors;
use axum::body::Body;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Router};
use bytes::Bytes;
use http::header::{CONTENT_TYPE, LOCATION, REFERER, VARY};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const TEMPLATE: &str = "<html><head>@inertiaHead</head><body>@inertia</body></html>";

fn layer() -> InertiaLayer {
    InertiaLayer::new()
        .version("v1")
        .root_view(TemplateRootView::inline(TEMPLATE))
}

fn app(layer: &InertiaLayer) -> Router {
    Router::new()
        .route("/users", get(users).post(store_user))
        .route("/dashboard", get(dashboard))
        .route("/empty", get(|| async { StatusCode::OK }))
        .route("/missing", get(missing))
        .layer(middleware::from_fn(layer.middleware()))
}

async fn users(inertia: Inertia) -> crate::Result<Response> {
    inertia
        .render(
            "Users/Index",
            Props::new()
                .with("users", json!([{"id": 1, "name": "Ada"}]))
                .with("FilterQuery", "a"),
        )?
        .await
}

async fn dashboard(inertia: Inertia) -> crate::Result<Response> {
    inertia.share("AuthUser", "ada");
    inertia
        .render(
            "Dashboard",
            Props::new()
                .with("stats", Prop::from_fn(|| 3))
                .with("activity", Prop::defer(Invokable::from_fn(|| vec!["login"])))
                .with("feed", Prop::defer_in(Invokable::from_fn(|| vec![1, 2]), "feeds")),
        )?
        .await
}

async fn store_user(inertia: Inertia) -> Response {
    inertia
        .back()
        .fallback("/users/create")
        .with_errors(ValidationErrors::new().with("FirstName", "The name field is required."))
        .into_response()
}

async fn titled(inertia: Inertia) -> crate::Result<Response> {
    inertia
        .render("Users/Index", Props::new())?
        .with_view_data("title", "Users & Teams")
        .await
}

async fn missing(inertia: Inertia) -> crate::Result<Response> {
    inertia.render("Nope/Missing", Props::new())?.await
}

fn inertia_get(uri: &str) -> http::request::Builder {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(headers::INERTIA, "true")
        .header(headers::VERSION, "v1")
}

async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

#[tokio::test]
async fn test_inertia_visit_returns_json_page() {
    let response = app(&layer())
        .oneshot(inertia_get("/users?page=2").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[headers::INERTIA], "true");
    assert_eq!(response.headers()[VARY], "X-Inertia");
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

    let page = body_json(response).await;
    assert_eq!(
        page,
        json!({
            "component": "Users/Index",
            "props": {
                "errors": {},
                "users": [{"id": 1, "name": "Ada"}],
                "filterQuery": "a"
            },
            "version": "v1",
            "url": "/users?page=2",
            "encryptHistory": false,
            "clearHistory": false
        })
    );
}

#[tokio::test]
async fn test_first_load_renders_html() {
    let response = app(&layer())
        .oneshot(Request::get("/users").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(response.headers().get(headers::INERTIA).is_none());

    let html = body_text(response).await;
    assert!(html.starts_with("<html><head></head><body><div id=\"app\" data-page=\""));
    assert!(html.contains("&quot;component&quot;:&quot;Users/Index&quot;"));
    assert!(html.contains("&quot;filterQuery&quot;:&quot;a&quot;"));
}

#[tokio::test]
async fn test_view_data_reaches_template() {
    let layer = InertiaLayer::new()
        .version("v1")
        .root_view(TemplateRootView::inline("<title>@viewData.title</title>@inertia"));
    let app = Router::new()
        .route("/titled", get(titled))
        .layer(middleware::from_fn(layer.middleware()));

    let response = app
        .oneshot(Request::get("/titled").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.starts_with("<title>Users &amp; Teams</title><div id=\"app\""));
    assert!(!html.contains("&quot;title&quot;"));
}

#[tokio::test]
async fn test_deferred_props_listed_on_first_load() {
    let response = app(&layer())
        .oneshot(inertia_get("/dashboard").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let page = body_json(response).await;

    assert_eq!(page["props"]["stats"], 3);
    assert_eq!(page["props"]["authUser"], "ada");
    assert!(page["props"].get("activity").is_none());
    assert_eq!(
        page["deferredProps"],
        json!({"default": ["activity"], "feeds": ["feed"]})
    );
}

#[tokio::test]
async fn test_partial_reload_fetches_deferred_group() {
    let response = app(&layer())
        .oneshot(
            inertia_get("/dashboard")
                .header(headers::PARTIAL_COMPONENT, "Dashboard")
                .header(headers::PARTIAL_ONLY, "activity")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let page = body_json(response).await;

    assert_eq!(page["props"], json!({"errors": {}, "activity": ["login"]}));
    assert!(page.get("deferredProps").is_none());
}

#[tokio::test]
async fn test_stale_version_conflicts_without_running_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let layer = layer();
    let app = Router::new()
        .route(
            "/users",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    StatusCode::OK
                }
            }),
        )
        .layer(middleware::from_fn(layer.middleware()));

    let response = app
        .oneshot(
            Request::get("/users?name=J%C3%BCrgen")
                .header(headers::INERTIA, "true")
                .header(headers::VERSION, "v0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        response.headers()[headers::LOCATION].as_bytes(),
        "/users?name=Jürgen".as_bytes()
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_client_version_conflicts() {
    let response = app(&layer())
        .oneshot(
            Request::get("/users")
                .header(headers::INERTIA, "true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_stale_post_is_not_a_conflict() {
    let response = app(&layer())
        .oneshot(
            Request::post("/users")
                .header(headers::INERTIA, "true")
                .header(headers::VERSION, "v0")
                .header(REFERER, "/users/create")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_set_version_applies_to_running_middleware() {
    let layer = layer();
    let app = app(&layer);

    layer.set_version("v2");
    let stale = app
        .clone()
        .oneshot(inertia_get("/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(stale.status(), StatusCode::CONFLICT);

    let fresh = app
        .oneshot(
            Request::get("/users")
                .header(headers::INERTIA, "true")
                .header(headers::VERSION, "v2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(fresh.status(), StatusCode::OK);
    assert_eq!(body_json(fresh).await["version"], "v2");
}

#[tokio::test]
async fn test_version_resolver_runs_per_request() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let layer = InertiaLayer::new()
        .root_view(TemplateRootView::inline(TEMPLATE))
        .version_resolver(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some("hash".to_string())
        });

    let response = app(&layer)
        .oneshot(
            Request::get("/users")
                .header(headers::INERTIA, "true")
                .header(headers::VERSION, "hash")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(hits.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn test_url_resolver_sets_page_url() {
    let layer = layer().url_resolver(|req| format!("https://app.test{}", req.requested_uri()));
    let page = body_json(
        app(&layer)
            .oneshot(inertia_get("/users?q=a%20b").body(Body::empty()).unwrap())
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(page["url"], "https://app.test/users?q=a b");
}

#[tokio::test]
async fn test_back_with_errors_survives_redirect() {
    let layer = layer().transient_store(MemoryStore::new());
    let app = app(&layer);

    let redirect = app
        .clone()
        .oneshot(
            Request::post("/users")
                .header(headers::INERTIA, "true")
                .header(headers::VERSION, "v1")
                .header(REFERER, "/users/create")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(redirect.status(), StatusCode::SEE_OTHER);
    assert_eq!(redirect.headers()[LOCATION], "/users/create");

    let page = body_json(
        app.clone()
            .oneshot(inertia_get("/users").body(Body::empty()).unwrap())
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(
        page["props"]["errors"],
        json!({"firstName": "The name field is required."})
    );

    let again = body_json(
        app.oneshot(inertia_get("/users").body(Body::empty()).unwrap())
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(again["props"]["errors"], json!({}));
}

#[tokio::test]
async fn test_back_on_plain_request_uses_found() {
    let response = app(&layer())
        .oneshot(Request::post("/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "/users/create");
}

#[tokio::test]
async fn test_empty_inertia_response_redirects_back() {
    let response = app(&layer())
        .oneshot(
            inertia_get("/empty")
                .header(REFERER, "/previous")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/previous");
}

#[tokio::test]
async fn test_whitespace_inertia_response_redirects_back() {
    let layer = layer();
    let app = Router::new()
        .route("/blank", get(|| async { " \n " }))
        .layer(middleware::from_fn(layer.middleware()));

    let response = app
        .oneshot(inertia_get("/blank").header(REFERER, "/previous").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/previous");
}

#[tokio::test]
async fn test_streamed_inertia_response_passes_through() {
    let layer = layer();
    let app = Router::new()
        .route(
            "/stream",
            get(|| async {
                let chunks = vec![
                    Ok::<_, std::io::Error>(Bytes::from_static(b" ")),
                    Ok(Bytes::from_static(b" ")),
                ];
                Body::from_stream(futures::stream::iter(chunks))
            }),
        )
        .layer(middleware::from_fn(layer.middleware()));

    let response = app
        .oneshot(inertia_get("/stream").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, Bytes::from_static(b"  "));
}

#[tokio::test]
async fn test_empty_plain_response_is_untouched() {
    let response = app(&layer())
        .oneshot(Request::get("/empty").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_extractor_without_layer_fails() {
    let app = Router::new().route("/users", get(users));
    let response = app
        .oneshot(Request::get("/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_missing_component_fails_render() {
    let dir = tempfile::tempdir().unwrap();
    let config = InertiaConfig::default()
        .with_content_root(dir.path())
        .with_ensure_pages_exist(true);
    let layer = InertiaLayer::with_config(config)
        .version("v1")
        .root_view(TemplateRootView::inline(TEMPLATE));

    let response = app(&layer)
        .oneshot(inertia_get("/missing").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("Nope/Missing"));
}

#[tokio::test]
async fn test_ssr_output_fills_root_view() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/render")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"head":["<title>Users</title>"],"body":"<div id=\"app\">ssr</div>"}"#)
        .create_async()
        .await;

    let config = InertiaConfig::default().with_ssr(format!("{}/render", server.url()));
    let layer = InertiaLayer::with_config(config)
        .version("v1")
        .root_view(TemplateRootView::inline(TEMPLATE));

    let response = app(&layer)
        .oneshot(Request::get("/users").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "<html><head><title>Users</title></head><body><div id=\"app\">ssr</div></body></html>"
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_ssr_failure_falls_back_to_client_rendering() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/render")
        .with_status(500)
        .create_async()
        .await;

    let config = InertiaConfig::default().with_ssr(format!("{}/render", server.url()));
    let layer = InertiaLayer::with_config(config)
        .version("v1")
        .root_view(TemplateRootView::inline(TEMPLATE));

    let response = app(&layer)
        .oneshot(Request::get("/users").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("data-page="));
}

#[test]
fn test_layer_is_usable_outside_runtime() {
    let layer = layer();
    assert_eq!(layer.current_version().as_deref(), Some("v1"));

    let state = layer.state();
    let page = tokio_test::block_on(async {
        let request = crate::server::InertiaRequest::from_parts(
            &http::Method::GET,
            &http::Uri::from_static("/"),
            &http::HeaderMap::new(),
        );
        Inertia::new(request, state, Default::default(), None)
            .render("Home", Props::new().with("greeting", "hi"))
            .unwrap()
            .resolve()
            .await
            .unwrap()
    });
    assert_eq!(page.props["greeting"], "hi");
    assert_eq!(page.version.as_deref(), Some("v1"));
}
