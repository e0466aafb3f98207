//! Adapter configuration.
//!
//! `InertiaConfig` is deserializable, so it can be loaded from whatever config
//! source the application already uses:
//!
//! ```
//! use inertia_axum::InertiaConfig;
//!
//! let config: InertiaConfig = serde_json::from_str(r#"{
//!     "root_view": "~/templates/app.html",
//!     "ssr_enabled": true
//! }"#).unwrap();
//! assert!(config.ssr_enabled);
//! assert_eq!(config.redirect_status, 303);
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for [`InertiaLayer`](super::InertiaLayer).
///
/// Paths starting with `~/`, and relative paths, resolve against `content_root`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InertiaConfig {
    /// HTML template wrapping the first page load
    pub root_view: String,

    /// Render first loads through the SSR server
    pub ssr_enabled: bool,

    /// SSR render endpoint
    pub ssr_url: String,

    /// Timeout of one SSR call, in milliseconds
    pub ssr_timeout_ms: u64,

    /// Only call the SSR server when a bundle exists on disk
    pub ssr_ensure_bundle_exists: bool,

    /// Candidate locations of the SSR bundle
    pub ssr_bundle_paths: Vec<String>,

    /// Default for the page `encryptHistory` flag
    pub encrypt_history: bool,

    /// Fail renders whose component has no file under `page_paths`
    pub ensure_pages_exist: bool,

    /// Directories searched for page components
    pub page_paths: Vec<String>,

    /// File extensions tried for page components
    pub page_extensions: Vec<String>,

    /// Base directory for relative and `~/` paths
    pub content_root: PathBuf,

    /// Status used when redirecting an Inertia request back
    pub redirect_status: u16,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            root_view: "~/templates/app.html".to_string(),
            ssr_enabled: false,
            ssr_url: "http://127.0.0.1:13714/render".to_string(),
            ssr_timeout_ms: 5000,
            ssr_ensure_bundle_exists: false,
            ssr_bundle_paths: [
                "public/js/ssr.js",
                "public/build/ssr.js",
                "dist/ssr.js",
                "build/ssr.js",
                "bootstrap/ssr/ssr.js",
            ]
            .map(String::from)
            .to_vec(),
            encrypt_history: false,
            ensure_pages_exist: false,
            page_paths: [
                "~/src/Pages",
                "~/src/pages",
                "~/frontend/src/Pages",
                "~/frontend/src/pages",
            ]
            .map(String::from)
            .to_vec(),
            page_extensions: [".vue", ".svelte", ".js", ".jsx", ".ts", ".tsx"]
                .map(String::from)
                .to_vec(),
            content_root: PathBuf::from("."),
            redirect_status: 303,
        }
    }
}

impl InertiaConfig {
    /// Set the root view template path.
    #[must_use]
    pub fn with_root_view(mut self, root_view: impl Into<String>) -> Self {
        self.root_view = root_view.into();
        self
    }

    /// Enable SSR against `url`.
    #[must_use]
    pub fn with_ssr(mut self, url: impl Into<String>) -> Self {
        self.ssr_enabled = true;
        self.ssr_url = url.into();
        self
    }

    /// Require an SSR bundle on disk before calling the SSR server.
    #[must_use]
    pub fn with_ssr_bundle_check(mut self, ensure: bool) -> Self {
        self.ssr_ensure_bundle_exists = ensure;
        self
    }

    /// Default history encryption.
    #[must_use]
    pub fn with_encrypt_history(mut self, encrypt: bool) -> Self {
        self.encrypt_history = encrypt;
        self
    }

    /// Enable or disable page existence checks.
    #[must_use]
    pub fn with_ensure_pages_exist(mut self, ensure: bool) -> Self {
        self.ensure_pages_exist = ensure;
        self
    }

    /// Replace the page search paths.
    #[must_use]
    pub fn with_page_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.page_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the page file extensions.
    #[must_use]
    pub fn with_page_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.page_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the content root.
    #[must_use]
    pub fn with_content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = root.into();
        self
    }

    /// Set the redirect status for Inertia back redirects.
    #[must_use]
    pub fn with_redirect_status(mut self, status: u16) -> Self {
        self.redirect_status = status;
        self
    }

    /// SSR call timeout.
    #[inline]
    #[must_use]
    pub fn ssr_timeout(&self) -> Duration {
        Duration::from_millis(self.ssr_timeout_ms)
    }

    /// Resolve a configured path against `content_root`.
    ///
    /// ```
    /// use inertia_axum::InertiaConfig;
    /// use std::path::Path;
    ///
    /// let config = InertiaConfig::default().with_content_root("/srv/app");
    /// assert_eq!(config.resolve_path("~/src/Pages"), Path::new("/srv/app/src/Pages"));
    /// assert_eq!(config.resolve_path("/abs/Pages"), Path::new("/abs/Pages"));
    /// ```
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            return self.content_root.join(rest);
        }
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.content_root.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InertiaConfig::default();
        assert_eq!(config.root_view, "~/templates/app.html");
        assert!(!config.ssr_enabled);
        assert_eq!(config.ssr_url, "http://127.0.0.1:13714/render");
        assert_eq!(config.ssr_timeout(), Duration::from_secs(5));
        assert_eq!(config.page_extensions.len(), 6);
        assert_eq!(config.redirect_status, 303);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: InertiaConfig =
            serde_json::from_str(r#"{"ensure_pages_exist": true, "page_paths": ["pages"]}"#)
                .unwrap();
        assert!(config.ensure_pages_exist);
        assert_eq!(config.page_paths, vec!["pages"]);
        assert_eq!(config.ssr_bundle_paths.len(), 5);
    }

    #[test]
    fn test_builders() {
        let config = InertiaConfig::default()
            .with_ssr("http://localhost:9000/render")
            .with_encrypt_history(true)
            .with_redirect_status(302);
        assert!(config.ssr_enabled);
        assert!(config.encrypt_history);
        assert_eq!(config.redirect_status, 302);
    }
}
