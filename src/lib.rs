#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Inertia for Axum
//!
//! Server-side adapter for the [Inertia.js](https://inertiajs.com) protocol. A
//! handler returns a *page*: a front-end component name plus its props. First
//! loads receive a full HTML document with the page embedded; client-side visits
//! (`X-Inertia: true`) receive the page as JSON.
//!
//! ## Key Features
//!
//! - **Partial reloads**: `X-Inertia-Partial-Data` / `-Except` select props
//! - **Prop kinds**: always, lazy, optional, deferred (grouped) and merge props
//! - **Merge metadata**: `mergeProps`, `deepMergeProps`, `mergeStrategies`, `matchPropsOn`
//! - **Shared props**: per-request props merged into every page
//! - **Providers**: domain objects expanding into props
//! - **Error bags**: validation errors carried across a redirect
//! - **Version conflicts**: stale clients get `409` + `X-Inertia-Location`
//! - **SSR**: optional render server with client-side fallback
//!
//! ## Server Usage
//!
//! ```ignore
//! use axum::{middleware, response::Response, routing::get, Router};
//! use inertia_axum::{Inertia, InertiaConfig, InertiaLayer, Invokable, Prop, Props};
//!
//! async fn users(inertia: Inertia) -> inertia_axum::Result<Response> {
//!     inertia
//!         .render("Users/Index", Props::new()
//!             .with("users", Prop::from_async(|| async { vec!["ada", "grace"] }))
//!             .with("stats", Prop::defer(Invokable::from_fn(|| 42))))?
//!         .await
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let inertia = InertiaLayer::with_config(InertiaConfig::default()).version("1");
//!     let app = Router::new()
//!         .route("/users", get(users))
//!         .layer(middleware::from_fn(inertia.middleware()));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[types]** - Wire payload and validation error types
//! - **[error]** - Error types and result handling
//! - **[props]** - Prop kinds, providers and shared props
//! - **[server]** - Axum middleware, extractor, resolution engine and redirects
//! - **[ssr]** - Server-side rendering gateway
//! - **[protocol]** - Header names and key normalization

pub mod error;
pub mod props;
pub mod protocol;
pub mod server;
pub mod ssr;
pub mod types;

pub use error::{InertiaError, Result};
pub use props::{Invokable, Mergeable, Prop, Props, SharedProps};
pub use server::{
    Back, Inertia, InertiaConfig, InertiaLayer, InertiaRequest, InertiaResponse, Location,
    MemoryStore, TransientStore,
};
pub use types::{ErrorBags, Page, ValidationErrors};

#[cfg(test)]
mod tests;
