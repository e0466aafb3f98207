//! HTTP gateway to the SSR render server.

use crate::error::{InertiaError, Result};
use crate::server::InertiaConfig;
use crate::types::Page;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

/// Pre-rendered fragments returned by the SSR server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SsrResponse {
    /// Tags for the document `<head>`
    #[serde(default)]
    pub head: Vec<String>,

    /// Rendered application markup
    #[serde(default)]
    pub body: String,
}

impl SsrResponse {
    /// Head tags joined by newlines.
    #[must_use]
    pub fn head_html(&self) -> String {
        self.head.join("\n")
    }
}

/// Server-side rendering backend.
///
/// Failures never fail a render: `dispatch` returns `None` and the page is
/// rendered client-side.
#[async_trait]
pub trait SsrGateway: Send + Sync {
    /// Render `page`; `None` on any failure.
    async fn dispatch(&self, page: &Page) -> Option<SsrResponse>;

    /// Whether an SSR call should be attempted at all.
    fn should_dispatch(&self) -> bool {
        true
    }

    /// Whether the render server answers its health probe.
    async fn is_healthy(&self) -> bool;
}

/// [`SsrGateway`] that POSTs the page as JSON to the configured URL.
///
/// # Examples
///
/// ```no_run
/// use inertia_axum::{InertiaConfig, ssr::{HttpGateway, SsrGateway}};
///
/// # async fn demo() {
/// let config = InertiaConfig::default().with_ssr("http://127.0.0.1:13714/render");
/// let gateway = HttpGateway::new(&config);
/// if gateway.is_healthy().await {
///     println!("ssr server up");
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    url: String,
    ensure_bundle_exists: bool,
    bundle_paths: Vec<PathBuf>,
}

impl HttpGateway {
    /// Build a gateway from the SSR settings of `config`.
    pub fn new(config: &InertiaConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.ssr_timeout())
            .build()
            .unwrap_or_default();

        if let Err(err) = url::Url::parse(&config.ssr_url) {
            tracing::warn!(url = %config.ssr_url, error = %err, "invalid ssr url, every dispatch will fail");
        }

        HttpGateway {
            client,
            url: config.ssr_url.clone(),
            ensure_bundle_exists: config.ssr_ensure_bundle_exists,
            bundle_paths: config
                .ssr_bundle_paths
                .iter()
                .map(|p| config.resolve_path(p))
                .collect(),
        }
    }

    /// Render endpoint.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// `<url>/health`, with any trailing slash of the render URL dropped.
    #[must_use]
    pub fn health_url(&self) -> String {
        format!("{}/health", self.url.trim_end_matches('/'))
    }

    /// Whether one of the configured bundle paths exists.
    pub fn bundle_exists(&self) -> bool {
        self.bundle_paths.iter().any(|p| p.is_file())
    }

    async fn try_dispatch(&self, page: &Page) -> Result<SsrResponse> {
        let response = self
            .client
            .post(&self.url)
            .json(page)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| InertiaError::Ssr(e.to_string()))
    }
}

#[async_trait]
impl SsrGateway for HttpGateway {
    async fn dispatch(&self, page: &Page) -> Option<SsrResponse> {
        match self.try_dispatch(page).await {
            Ok(response) => Some(response),
            Err(err) => {
                tracing::warn!(url = %self.url, error = %err, "ssr dispatch failed, rendering client-side");
                None
            }
        }
    }

    fn should_dispatch(&self) -> bool {
        !self.ensure_bundle_exists || self.bundle_exists()
    }

    async fn is_healthy(&self) -> bool {
        match self.client.get(self.health_url()).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!(error = %err, "ssr health probe failed");
                false
            }
        }
    }
}
