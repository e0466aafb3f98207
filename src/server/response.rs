//! Page responses: JSON for Inertia visits, HTML for first loads.

use super::resolve::PageResolver;
use super::session::TransientStoreHandle;
use super::view::ViewContext;
use super::{InertiaRequest, InertiaState};
use crate::error::Result;
use crate::props::{Prop, Props, ProvidesInertiaProperties, SharedProps};
use crate::protocol::constants::{headers, PROVIDER_KEY_PREFIX};
use crate::ssr::SsrResponse;
use crate::types::{Page, ValidationErrors};
use axum::response::{Html, IntoResponse, Json, Response};
use futures::future::BoxFuture;
use futures::FutureExt;
use http::header::VARY;
use http::HeaderValue;
use serde_json::{Map, Value};
use std::future::IntoFuture;
use std::sync::Arc;

/// A page render in progress.
///
/// Built by [`Inertia::render`](super::Inertia::render); awaiting it resolves the
/// props and produces the HTTP response.
///
/// # Examples
///
/// ```ignore
/// async fn index(inertia: Inertia) -> inertia_axum::Result<Response> {
///     inertia
///         .render("Users/Index", Props::new().with("users", Prop::from_async(load_users)))?
///         .with("filters", filters)
///         .with_view_data("title", "Users")
///         .await
/// }
/// ```
pub struct InertiaResponse {
    component: String,
    props: Props,
    view_data: Map<String, Value>,
    validation_errors: ValidationErrors,
    encrypt_history: bool,
    clear_history: bool,
    request: InertiaRequest,
    state: Arc<InertiaState>,
    shared: SharedProps,
    store: Option<TransientStoreHandle>,
}

impl InertiaResponse {
    pub(crate) fn new(
        component: String,
        props: Props,
        request: InertiaRequest,
        state: Arc<InertiaState>,
        shared: SharedProps,
        store: Option<TransientStoreHandle>,
    ) -> Self {
        InertiaResponse {
            encrypt_history: state.config().encrypt_history,
            component,
            props,
            view_data: Map::new(),
            validation_errors: ValidationErrors::new(),
            clear_history: false,
            request,
            state,
            shared,
            store,
        }
    }

    /// Add one prop.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, prop: impl Into<Prop>) -> Self {
        self.props.insert(key, prop);
        self
    }

    /// Add every prop of `props`.
    #[must_use]
    pub fn with_props(mut self, props: Props) -> Self {
        self.props.extend(props);
        self
    }

    /// Add a multi-property provider, expanded at resolution time.
    #[must_use]
    pub fn with_provider(mut self, provider: impl ProvidesInertiaProperties + 'static) -> Self {
        let key = format!("{}{}", PROVIDER_KEY_PREFIX, uuid::Uuid::new_v4().simple());
        self.props.insert(key, Prop::properties(provider));
        self
    }

    /// Extra data for the root view, ignored for JSON responses.
    #[must_use]
    pub fn with_view_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.view_data.insert(key.into(), value.into());
        self
    }

    /// Errors of the current request, used when nothing was stored by a redirect.
    #[must_use]
    pub fn with_validation_errors(mut self, errors: ValidationErrors) -> Self {
        self.validation_errors = errors;
        self
    }

    /// Override the configured history encryption.
    #[must_use]
    pub fn encrypt_history(mut self, encrypt: bool) -> Self {
        self.encrypt_history = encrypt;
        self
    }

    /// Ask the client to clear its history.
    #[must_use]
    pub fn clear_history(mut self, clear: bool) -> Self {
        self.clear_history = clear;
        self
    }

    /// Component being rendered.
    #[inline]
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Resolve the page without building a response.
    ///
    /// Consumes the one-time stored errors and clear-history marker.
    pub async fn resolve(&self) -> Result<Page> {
        PageResolver {
            component: &self.component,
            props: &self.props,
            shared: Some(&self.shared),
            request: &self.request,
            validation_errors: &self.validation_errors,
            store: self.store.as_deref(),
            version: self.state.version(),
            url: self.state.url_for(&self.request),
            encrypt_history: self.encrypt_history,
            clear_history: self.clear_history,
        }
        .resolve()
        .await
    }

    async fn respond(self) -> Result<Response> {
        let page = self.resolve().await?;
        if self.request.is_inertia {
            Ok(json_response(page))
        } else {
            self.html_response(&page).await
        }
    }

    async fn html_response(&self, page: &Page) -> Result<Response> {
        let page_json = page.to_json()?;

        let ssr: Option<SsrResponse> = match self.state.gateway() {
            Some(gateway) if gateway.should_dispatch() => gateway.dispatch(page).await,
            _ => None,
        };
        let ssr_head = ssr.as_ref().map(SsrResponse::head_html);

        let html = self.state.root_view().render(&ViewContext {
            page,
            page_json: &page_json,
            view_data: &self.view_data,
            ssr_head: ssr_head.as_deref(),
            ssr_body: ssr.as_ref().map(|s| s.body.as_str()),
        })?;
        Ok(Html(html).into_response())
    }
}

impl IntoFuture for InertiaResponse {
    type Output = Result<Response>;
    type IntoFuture = BoxFuture<'static, Result<Response>>;

    fn into_future(self) -> Self::IntoFuture {
        self.respond().boxed()
    }
}

impl std::fmt::Debug for InertiaResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InertiaResponse")
            .field("component", &self.component)
            .field("props", &self.props)
            .field("encrypt_history", &self.encrypt_history)
            .field("clear_history", &self.clear_history)
            .finish_non_exhaustive()
    }
}

fn json_response(page: Page) -> Response {
    let mut response = Json(page).into_response();
    let headers_mut = response.headers_mut();
    headers_mut.insert(headers::INERTIA, HeaderValue::from_static("true"));
    headers_mut.insert(VARY, HeaderValue::from_static("X-Inertia"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_response_headers() {
        let response = json_response(Page::new("Test/Page", "/"));
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(response.headers()[headers::INERTIA], "true");
        assert_eq!(response.headers()[VARY], "X-Inertia");
        assert_eq!(response.headers()[http::header::CONTENT_TYPE], "application/json");
    }
}
