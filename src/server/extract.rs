//! The `Inertia` handler extractor.

use super::pages::ensure_component_exists;
use super::redirect::{Back, Location};
use super::session::{mark_clear_history, TransientStoreHandle};
use super::{InertiaRequest, InertiaResponse, InertiaState};
use crate::error::{InertiaError, Result};
use crate::props::{Prop, Props, SharedProps};
use axum::extract::FromRequestParts;
use http::request::Parts;
use http::StatusCode;
use std::sync::Arc;

/// Per-request entry point for handlers.
///
/// Requires [`InertiaLayer`](super::InertiaLayer); extraction fails with a 500
/// otherwise.
///
/// # Examples
///
/// ```ignore
/// use axum::response::Response;
/// use inertia_axum::{Inertia, Prop, Props};
///
/// async fn show(inertia: Inertia) -> inertia_axum::Result<Response> {
///     inertia.share("flash", "Saved");
///     inertia
///         .render("Users/Show", Props::new()
///             .with("user", Prop::from_async(|| async { load_user().await }))
///             .with("activity", Prop::defer(Invokable::from_async(load_activity))))?
///         .await
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Inertia {
    request: InertiaRequest,
    state: Arc<InertiaState>,
    shared: SharedProps,
    store: Option<TransientStoreHandle>,
    encrypt_history: Option<bool>,
    clear_history: bool,
}

impl Inertia {
    /// Build an extractor by hand, e.g. outside a handler.
    pub fn new(
        request: InertiaRequest,
        state: Arc<InertiaState>,
        shared: SharedProps,
        store: Option<TransientStoreHandle>,
    ) -> Self {
        Inertia {
            request,
            state,
            shared,
            store,
            encrypt_history: None,
            clear_history: false,
        }
    }

    /// Start rendering `component` with `props`.
    ///
    /// Fails with [`InertiaError::ComponentNotFound`] when page existence checks
    /// are enabled and no file matches, before any prop is resolved.
    pub fn render(&self, component: impl Into<String>, props: Props) -> Result<InertiaResponse> {
        let component = component.into();
        let config = self.state.config();
        if config.ensure_pages_exist {
            ensure_component_exists(config, &component)?;
        }

        let mut response = InertiaResponse::new(
            component,
            props,
            self.request.clone(),
            self.state.clone(),
            self.shared.clone(),
            self.store.clone(),
        )
        .clear_history(self.clear_history);
        if let Some(encrypt) = self.encrypt_history {
            response = response.encrypt_history(encrypt);
        }
        Ok(response)
    }

    /// Share a prop with every page rendered for this request.
    pub fn share(&self, key: impl Into<String>, prop: impl Into<Prop>) {
        self.shared.set(key, prop);
    }

    /// Share several props at once.
    pub fn share_many(&self, props: Props) {
        self.shared.merge(props);
    }

    /// Shared props of this request.
    #[inline]
    #[must_use]
    pub fn shared(&self) -> &SharedProps {
        &self.shared
    }

    /// Override the configured history encryption for pages rendered from here.
    pub fn encrypt_history(&mut self, encrypt: bool) {
        self.encrypt_history = Some(encrypt);
    }

    /// Clear the client's history on the next page, here or after a redirect.
    pub fn clear_history(&mut self) {
        self.clear_history = true;
        match &self.store {
            Some(store) => mark_clear_history(&**store),
            None => tracing::debug!("no transient store, clear history only applies to this render"),
        }
    }

    /// Redirect back to the referer.
    #[must_use]
    pub fn back(&self) -> Back {
        let status = StatusCode::from_u16(self.state.config().redirect_status).unwrap_or_else(|_| {
            tracing::warn!(status = self.state.config().redirect_status, "invalid redirect status, using 303");
            StatusCode::SEE_OTHER
        });
        Back::new(&self.request, status).with_store(self.store.clone())
    }

    /// Redirect to `url` with a full page visit.
    #[must_use]
    pub fn location(&self, url: impl Into<String>) -> Location {
        Location::new(&self.request, url)
    }

    /// Current asset version token.
    #[must_use]
    pub fn version(&self) -> Option<String> {
        self.state.version()
    }

    /// Parsed Inertia request headers.
    #[inline]
    #[must_use]
    pub fn request(&self) -> &InertiaRequest {
        &self.request
    }

    /// Transient store of this request, if any.
    #[inline]
    #[must_use]
    pub fn store(&self) -> Option<&TransientStoreHandle> {
        self.store.as_ref()
    }
}

impl<S> FromRequestParts<S> for Inertia
where
    S: Send + Sync,
{
    type Rejection = InertiaError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let state = parts
            .extensions
            .get::<Arc<InertiaState>>()
            .cloned()
            .ok_or_else(|| InertiaError::Config("InertiaLayer middleware is not installed".into()))?;

        let request = match parts.extensions.get::<InertiaRequest>() {
            Some(request) => request.clone(),
            None => InertiaRequest::from_parts(&parts.method, &parts.uri, &parts.headers),
        };
        let shared = SharedProps::from_extensions(&mut parts.extensions);
        let store = parts.extensions.get::<TransientStoreHandle>().cloned();

        Ok(Inertia::new(request, state, shared, store))
    }
}
