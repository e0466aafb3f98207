//! Axum middleware for the Inertia protocol.
//!
//! # Usage
//!
//! ```ignore
//! use axum::{Router, routing::get, middleware};
//! use inertia_axum::{InertiaConfig, InertiaLayer};
//!
//! let inertia = InertiaLayer::with_config(InertiaConfig::default()).version("1.0.0");
//! let app = Router::new()
//!     .route("/", get(handler))
//!     .layer(middleware::from_fn(inertia.middleware()));
//! ```
//!
//! # How It Works
//!
//! For every request the middleware:
//! 1. parses the Inertia headers into an [`InertiaRequest`]
//! 2. answers stale Inertia GET visits with a 409 version conflict, without
//!    running the handler
//! 3. attaches the request, the adapter state and the transient store to the
//!    request extensions
//! 4. turns an empty 200 answer to an Inertia request into a back redirect

use super::redirect::{empty_response_back, version_conflict};
use super::session::{TransientStore, TransientStoreHandle};
use super::state::{InertiaState, InertiaVersion, UrlResolver};
use super::view::{RootView, TemplateRootView};
use super::{InertiaConfig, InertiaRequest};
use crate::ssr::{HttpGateway, SsrGateway};
use axum::body::{Body, HttpBody};
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::{Method, StatusCode};
use http_body_util::BodyExt;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

static MISSING_STORE_REPORTED: AtomicBool = AtomicBool::new(false);

/// Largest response body buffered to check for whitespace-only content.
const EMPTY_PROBE_LIMIT: u64 = 64;

/// Axum middleware layer for the Inertia protocol.
///
/// Holds the process-wide adapter state: configuration, version token, root view,
/// SSR gateway and the optional transient store. Cloning shares the version cell,
/// so [`set_version`](InertiaLayer::set_version) affects running middleware.
#[derive(Clone)]
pub struct InertiaLayer {
    config: InertiaConfig,
    version: Arc<RwLock<InertiaVersion>>,
    url_resolver: Option<UrlResolver>,
    root_view: Option<Arc<dyn RootView>>,
    gateway: Option<Arc<dyn SsrGateway>>,
    store: Option<TransientStoreHandle>,
}

impl InertiaLayer {
    /// Layer with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(InertiaConfig::default())
    }

    /// Layer with a custom configuration.
    #[must_use]
    pub fn with_config(config: InertiaConfig) -> Self {
        Self {
            config,
            version: Arc::new(RwLock::new(InertiaVersion::None)),
            url_resolver: None,
            root_view: None,
            gateway: None,
            store: None,
        }
    }

    /// Layer configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &InertiaConfig {
        &self.config
    }

    /// Set the asset version token.
    #[must_use]
    pub fn version(self, version: impl Into<InertiaVersion>) -> Self {
        self.set_version(version);
        self
    }

    /// Compute the version token on every request.
    #[must_use]
    pub fn version_resolver<F>(self, resolver: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.set_version(InertiaVersion::Resolver(Arc::new(resolver)));
        self
    }

    /// Replace the version token, also for middleware already built.
    pub fn set_version(&self, version: impl Into<InertiaVersion>) {
        *self.version.write() = version.into();
    }

    /// Current version token.
    #[must_use]
    pub fn current_version(&self) -> Option<String> {
        self.version.read().resolve()
    }

    /// Compute the page URL from the request instead of using its path and query.
    #[must_use]
    pub fn url_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&InertiaRequest) -> String + Send + Sync + 'static,
    {
        self.url_resolver = Some(Arc::new(resolver));
        self
    }

    /// Replace the template-file root view.
    #[must_use]
    pub fn root_view(mut self, view: impl RootView + 'static) -> Self {
        self.root_view = Some(Arc::new(view));
        self
    }

    /// Render first loads through `gateway`; enables SSR.
    #[must_use]
    pub fn ssr_gateway(mut self, gateway: impl SsrGateway + 'static) -> Self {
        self.config.ssr_enabled = true;
        self.gateway = Some(Arc::new(gateway));
        self
    }

    /// Transient store used when the request carries none.
    #[must_use]
    pub fn transient_store(mut self, store: impl TransientStore + 'static) -> Self {
        self.store = Some(TransientStoreHandle::new(store));
        self
    }

    /// Snapshot of the state handed to requests.
    #[must_use]
    pub fn state(&self) -> Arc<InertiaState> {
        let root_view = self.root_view.clone().unwrap_or_else(|| {
            Arc::new(TemplateRootView::from_file(
                self.config.resolve_path(&self.config.root_view),
            )) as Arc<dyn RootView>
        });
        let gateway = match &self.gateway {
            Some(gateway) => Some(gateway.clone()),
            None if self.config.ssr_enabled => {
                Some(Arc::new(HttpGateway::new(&self.config)) as Arc<dyn SsrGateway>)
            }
            None => None,
        };

        Arc::new(InertiaState {
            config: self.config.clone(),
            version: self.version.clone(),
            url_resolver: self.url_resolver.clone(),
            root_view,
            gateway,
            store: self.store.clone(),
        })
    }

    /// Create the middleware function for `axum::middleware::from_fn`.
    #[must_use]
    pub fn middleware(
        &self,
    ) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
             + Send
             + Sync
             + Clone {
        let state = self.state();

        move |mut req: Request, next: Next| {
            let state = state.clone();
            Box::pin(async move {
                let inertia = InertiaRequest::from_parts(req.method(), req.uri(), req.headers());

                if req.extensions().get::<TransientStoreHandle>().is_none() {
                    match &state.store {
                        Some(store) => {
                            req.extensions_mut().insert(store.clone());
                        }
                        None => report_missing_store(),
                    }
                }

                if is_stale(&inertia, &state) {
                    tracing::debug!(
                        client = ?inertia.version,
                        server = ?state.version(),
                        uri = %inertia.uri,
                        "inertia version conflict"
                    );
                    if let Some(store) = req.extensions().get::<TransientStoreHandle>() {
                        store.keep();
                    }
                    return version_conflict(&inertia);
                }

                req.extensions_mut().insert(state.clone());
                req.extensions_mut().insert(inertia.clone());

                let response = next.run(req).await;

                if inertia.is_inertia && response.status() == StatusCode::OK {
                    return redirect_if_empty(response, &inertia, &state).await;
                }
                response
            })
        }
    }
}

impl Default for InertiaLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InertiaLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InertiaLayer")
            .field("config", &self.config)
            .field("version", &*self.version.read())
            .finish_non_exhaustive()
    }
}

fn is_stale(request: &InertiaRequest, state: &InertiaState) -> bool {
    request.is_inertia
        && request.method == Method::GET
        && request.version.as_deref().unwrap_or_default() != state.version().unwrap_or_default()
}

fn report_missing_store() {
    if !MISSING_STORE_REPORTED.swap(true, Ordering::Relaxed) {
        tracing::warn!(
            "no transient store configured: validation errors and clear-history will not survive redirects"
        );
    }
}

async fn redirect_if_empty(response: Response, request: &InertiaRequest, state: &InertiaState) -> Response {
    let back_status =
        StatusCode::from_u16(state.config().redirect_status).unwrap_or(StatusCode::SEE_OTHER);

    let declared = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    match declared.or_else(|| response.body().size_hint().upper()) {
        Some(0) => {
            tracing::debug!(uri = %request.uri, "empty inertia response, redirecting back");
            return empty_response_back(request, back_status);
        }
        Some(len) if len <= EMPTY_PROBE_LIMIT => {}
        // large or unbounded bodies pass through unbuffered
        _ => return response,
    }

    let (parts, body) = response.into_parts();
    match body.collect().await {
        Ok(collected) => {
            let bytes: Bytes = collected.to_bytes();
            if bytes.iter().all(u8::is_ascii_whitespace) {
                tracing::debug!(uri = %request.uri, "empty inertia response, redirecting back");
                empty_response_back(request, back_status)
            } else {
                Response::from_parts(parts, Body::from(bytes))
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to read response body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
