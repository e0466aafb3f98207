//! Error types for the Inertia adapter.
//!
//! Errors fall into two groups:
//!
//! | Kind | Surfaced as |
//! |------|-------------|
//! | [`InertiaError::ComponentNotFound`] | 500, raised before any prop is resolved |
//! | [`InertiaError::Resolution`] | 500, a prop producer failed; no partial page is sent |
//! | [`InertiaError::Serialization`] | 500, the page could not be encoded |
//! | [`InertiaError::View`] | 500, the root view could not be rendered |
//! | [`InertiaError::Ssr`] | never surfaced; the dispatcher falls back to client-side rendering |
//! | [`InertiaError::Config`] | 500, invalid configuration detected at request time |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, InertiaError>;

/// Errors produced while building or dispatching an Inertia page.
#[derive(Debug, thiserror::Error)]
pub enum InertiaError {
    /// Page existence checking is enabled and no file matches the component.
    #[error("Inertia page component '{component}' not found")]
    ComponentNotFound {
        /// Component name as passed to `render`
        component: String,
    },

    /// A prop producer or provider failed during resolution.
    #[error("failed to resolve prop: {0}")]
    Resolution(#[source] anyhow::Error),

    /// The page payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The root view could not be rendered.
    #[error("view error: {0}")]
    View(String),

    /// Talking to the SSR server failed.
    #[error("ssr error: {0}")]
    Ssr(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl InertiaError {
    /// Whether the error is recovered locally instead of failing the render.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, InertiaError::Ssr(_))
    }

    /// HTTP status code this error maps to when returned from a handler.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<reqwest::Error> for InertiaError {
    fn from(e: reqwest::Error) -> Self {
        InertiaError::Ssr(e.to_string())
    }
}

impl IntoResponse for InertiaError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "inertia render failed");
        (self.status_code(), self.to_string()).into_response()
    }
}
