//! Redirect helpers.
//!
//! | Helper | Inertia request | Plain request |
//! |--------|-----------------|---------------|
//! | [`Back`] | configured status (303) + `Location` | 302 + `Location` |
//! | [`Location`] | 409 + `X-Inertia-Location` | 302 + `Location` |
//! | version conflict | 409 + `X-Inertia-Location` | n/a |

use super::session::{store_validation_errors, TransientStoreHandle};
use super::InertiaRequest;
use crate::error::InertiaError;
use crate::protocol::constants::{headers, DEFAULT_ERROR_BAG};
use crate::types::ValidationErrors;
use axum::response::{IntoResponse, Response};
use http::header::LOCATION;
use http::{HeaderName, HeaderValue, StatusCode};

/// Redirect to the previous page.
///
/// The target is the `Referer` header, else the fallback, else `/`. Pending
/// validation errors are persisted for the next render before redirecting.
///
/// # Examples
///
/// ```ignore
/// async fn store(inertia: Inertia, Json(form): Json<Form>) -> Back {
///     let errors = form.validate();
///     inertia.back().fallback("/users/create").with_errors(errors)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Back {
    referer: Option<String>,
    is_inertia: bool,
    fallback: Option<String>,
    status: StatusCode,
    store: Option<TransientStoreHandle>,
    errors: ValidationErrors,
    error_bag: Option<String>,
}

impl Back {
    /// Back redirect for `request`, answering Inertia requests with `status`.
    #[must_use]
    pub fn new(request: &InertiaRequest, status: StatusCode) -> Self {
        Back {
            referer: request.referer.clone(),
            is_inertia: request.is_inertia,
            fallback: None,
            status,
            store: None,
            errors: ValidationErrors::new(),
            error_bag: request.error_bag.clone(),
        }
    }

    /// Target used when the request has no referer.
    #[must_use]
    pub fn fallback(mut self, url: impl Into<String>) -> Self {
        self.fallback = Some(url.into()).filter(|u| !u.is_empty());
        self
    }

    /// Errors to surface on the next render.
    #[must_use]
    pub fn with_errors(mut self, errors: ValidationErrors) -> Self {
        self.errors = errors;
        self
    }

    /// Bag the errors are stored under, `"default"` when unset.
    #[must_use]
    pub fn error_bag(mut self, bag: impl Into<String>) -> Self {
        self.error_bag = Some(bag.into());
        self
    }

    /// Store the errors are persisted to.
    #[must_use]
    pub fn with_store(mut self, store: Option<TransientStoreHandle>) -> Self {
        self.store = store;
        self
    }

    /// Redirect target.
    #[must_use]
    pub fn target(&self) -> String {
        self.referer
            .as_deref()
            .or(self.fallback.as_deref())
            .unwrap_or("/")
            .to_string()
    }

    fn persist_errors(&self) -> crate::Result<()> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let bag = self.error_bag.as_deref().unwrap_or(DEFAULT_ERROR_BAG);
        match &self.store {
            Some(store) => store_validation_errors(&**store, &self.errors, bag),
            None => {
                tracing::warn!(bag, "no transient store, validation errors are dropped");
                Ok(())
            }
        }
    }
}

impl IntoResponse for Back {
    fn into_response(self) -> Response {
        if let Err(err) = self.persist_errors() {
            return err.into_response();
        }
        let status = if self.is_inertia { self.status } else { StatusCode::FOUND };
        redirect(status, LOCATION, &self.target())
    }
}

/// Redirect to a URL outside the Inertia app, or force a full page visit.
#[derive(Debug, Clone)]
pub struct Location {
    url: String,
    is_inertia: bool,
}

impl Location {
    /// Location redirect to `url` for `request`.
    #[must_use]
    pub fn new(request: &InertiaRequest, url: impl Into<String>) -> Self {
        Location {
            url: url.into(),
            is_inertia: request.is_inertia,
        }
    }

    /// Redirect target.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl IntoResponse for Location {
    fn into_response(self) -> Response {
        if self.is_inertia {
            redirect(StatusCode::CONFLICT, headers::LOCATION, &self.url)
        } else {
            redirect(StatusCode::FOUND, LOCATION, &self.url)
        }
    }
}

/// 409 answer to a stale asset version, pointing the client at the same URL.
pub(crate) fn version_conflict(request: &InertiaRequest) -> Response {
    redirect(StatusCode::CONFLICT, headers::LOCATION, &request.requested_uri())
}

/// Back redirect used when an Inertia handler produced an empty body.
pub(crate) fn empty_response_back(request: &InertiaRequest, status: StatusCode) -> Response {
    Back::new(request, status).into_response()
}

fn redirect(status: StatusCode, header: HeaderName, url: &str) -> Response {
    // decoded URLs may carry non-ASCII bytes; from_bytes accepts them as obs-text
    match HeaderValue::from_bytes(url.as_bytes()) {
        Ok(value) => (status, [(header, value)]).into_response(),
        Err(_) => InertiaError::Config(format!("invalid redirect target {url:?}")).into_response(),
    }
}
