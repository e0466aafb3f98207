//! Basic Inertia server example
//!
//! Serves a small user directory with deferred, merge and always props, a form
//! that redirects back with validation errors, and a version conflict on
//! `POST /deploy`.
//!
//! Run with: cargo run --example server_basic

use axum::{
    extract::{Query, State},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use inertia_axum::{
    Inertia, InertiaConfig, InertiaLayer, Invokable, Mergeable, MemoryStore, Prop, Props,
    ValidationErrors,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>@viewData.title</title>
    @inertiaHead
    <script type="module" src="/assets/app.js"></script>
  </head>
  <body>
    @inertia
  </body>
</html>"#;

#[derive(Clone)]
struct AppState {
    users: Arc<RwLock<Vec<String>>>,
    inertia: InertiaLayer,
}

#[derive(Deserialize)]
struct Paging {
    page: Option<usize>,
}

#[derive(Deserialize)]
struct NewUser {
    name: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Inertia Server Basic Example");
    println!("============================\n");
    println!("Starting server on http://localhost:3000");

    let inertia = InertiaLayer::with_config(InertiaConfig::default())
        .version("1")
        .root_view(inertia_axum::server::TemplateRootView::inline(TEMPLATE))
        .transient_store(MemoryStore::new());

    let state = AppState {
        users: Arc::new(RwLock::new(vec!["Ada".into(), "Grace".into()])),
        inertia: inertia.clone(),
    };

    let app = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/deploy", post(deploy))
        .route("/docs", get(docs))
        .layer(middleware::from_fn(inertia.middleware()))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}

async fn list_users(
    State(state): State<AppState>,
    inertia: Inertia,
    Query(paging): Query<Paging>,
) -> inertia_axum::Result<Response> {
    let page = paging.page.unwrap_or(1);
    let users = state.users.read().await.clone();
    inertia.share("appName", "Inertia Demo");

    inertia
        .render(
            "Users/Index",
            Props::new()
                .with("users", json!(users))
                .with("currentPage", page as i64)
                .with(
                    "feed",
                    Prop::merge_prop(Invokable::from_fn(move || {
                        vec![json!({"id": page, "text": format!("entry {}", page)})]
                    }))
                    .matches_on(["id"]),
                )
                .with(
                    "stats",
                    Prop::defer(Invokable::from_async(|| async {
                        tokio::time::sleep(Duration::from_millis(200)).await;
                        json!({"visits": 1024})
                    })),
                )
                .with("csrfToken", Prop::always("demo-token")),
        )?
        .with_view_data("title", "Users")
        .await
}

async fn create_user(
    State(state): State<AppState>,
    inertia: Inertia,
    Form(form): Form<NewUser>,
) -> Response {
    let name = form.name.trim();
    if name.is_empty() {
        return inertia
            .back()
            .fallback("/users")
            .with_errors(ValidationErrors::new().with("name", "The name field is required."))
            .into_response();
    }

    state.users.write().await.push(name.to_string());
    inertia.back().fallback("/users").into_response()
}

async fn deploy(State(state): State<AppState>, inertia: Inertia) -> Response {
    let next = state
        .inertia
        .current_version()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0)
        + 1;
    state.inertia.set_version(next.to_string());
    println!("Asset version bumped to {}", next);
    inertia.back().fallback("/users").into_response()
}

async fn docs(inertia: Inertia) -> Response {
    inertia.location("https://inertiajs.com").into_response()
}
