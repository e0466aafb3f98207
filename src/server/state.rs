//! Process-wide adapter state shared by every request.

use super::session::TransientStoreHandle;
use super::view::RootView;
use super::{InertiaConfig, InertiaRequest};
use crate::ssr::SsrGateway;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Produces the page URL for a request.
pub type UrlResolver = Arc<dyn Fn(&InertiaRequest) -> String + Send + Sync>;

/// Asset version token source.
#[derive(Clone, Default)]
pub enum InertiaVersion {
    /// No version; clients sending an empty or missing version header match
    #[default]
    None,
    /// Fixed token
    Fixed(String),
    /// Token computed on every request
    Resolver(Arc<dyn Fn() -> Option<String> + Send + Sync>),
}

impl InertiaVersion {
    /// Current token.
    pub fn resolve(&self) -> Option<String> {
        match self {
            InertiaVersion::None => None,
            InertiaVersion::Fixed(v) => Some(v.clone()),
            InertiaVersion::Resolver(f) => f(),
        }
    }
}

impl fmt::Debug for InertiaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InertiaVersion::None => f.write_str("None"),
            InertiaVersion::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            InertiaVersion::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl From<&str> for InertiaVersion {
    fn from(v: &str) -> Self {
        InertiaVersion::Fixed(v.to_string())
    }
}

impl From<String> for InertiaVersion {
    fn from(v: String) -> Self {
        InertiaVersion::Fixed(v)
    }
}

/// Snapshot handed to every request by the middleware.
///
/// Everything but the version cell is fixed once the layer is built.
pub struct InertiaState {
    pub(crate) config: InertiaConfig,
    pub(crate) version: Arc<RwLock<InertiaVersion>>,
    pub(crate) url_resolver: Option<UrlResolver>,
    pub(crate) root_view: Arc<dyn RootView>,
    pub(crate) gateway: Option<Arc<dyn SsrGateway>>,
    pub(crate) store: Option<TransientStoreHandle>,
}

impl InertiaState {
    /// Adapter configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &InertiaConfig {
        &self.config
    }

    /// Current version token.
    pub fn version(&self) -> Option<String> {
        self.version.read().resolve()
    }

    /// Page URL for `request`.
    pub fn url_for(&self, request: &InertiaRequest) -> String {
        match &self.url_resolver {
            Some(resolve) => resolve(request),
            None => request.requested_uri(),
        }
    }

    /// Root view used for first loads.
    #[inline]
    pub fn root_view(&self) -> &dyn RootView {
        &*self.root_view
    }

    /// SSR gateway, when SSR is enabled.
    #[inline]
    pub fn gateway(&self) -> Option<&dyn SsrGateway> {
        self.gateway.as_deref()
    }
}

impl fmt::Debug for InertiaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InertiaState")
            .field("config", &self.config)
            .field("version", &*self.version.read())
            .field("url_resolver", &self.url_resolver.is_some())
            .field("ssr", &self.gateway.is_some())
            .field("store", &self.store.is_some())
            .finish()
    }
}
