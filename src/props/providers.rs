//! Property-provider capabilities.
//!
//! Domain objects can take part in page resolution in two ways:
//!
//! - [`ProvidesInertiaProperties`] expands into several named props, computed from
//!   the [`RenderContext`]. The provider entry itself is removed.
//! - [`ProvidesInertiaProperty`] turns itself into the value of the key it is
//!   stored under, computed from the [`PropertyContext`].
//!
//! # Examples
//!
//! ```
//! use inertia_axum::props::{Props, ProvidesInertiaProperties, RenderContext};
//!
//! struct CurrentUser;
//!
//! impl ProvidesInertiaProperties for CurrentUser {
//!     fn to_inertia_properties(&self, ctx: &RenderContext<'_>) -> Props {
//!         Props::new()
//!             .with("user", "John Doe")
//!             .with("component", ctx.component)
//!     }
//! }
//! ```

use super::Props;
use crate::server::InertiaRequest;
use serde_json::Value;

/// Context passed to multi-property providers.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Component being rendered
    pub component: &'a str,
    /// Current request
    pub request: &'a InertiaRequest,
}

/// Context passed to single-property providers.
#[derive(Debug, Clone, Copy)]
pub struct PropertyContext<'a> {
    /// camelCase key the value is resolved for
    pub key: &'a str,
    /// All props that survived filtering, unresolved
    pub props: &'a Props,
    /// Current request
    pub request: &'a InertiaRequest,
}

/// Expands into a set of named props.
pub trait ProvidesInertiaProperties: Send + Sync {
    /// Props to splice in place of the provider.
    fn to_inertia_properties(&self, ctx: &RenderContext<'_>) -> Props;
}

/// Resolves into the value of the key it is stored under.
pub trait ProvidesInertiaProperty: Send + Sync {
    /// Value for `ctx.key`.
    fn to_inertia_property(&self, ctx: &PropertyContext<'_>) -> Value;
}
