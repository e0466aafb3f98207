//! Protocol constants for the Inertia wire format.

/// Inertia request and response header names.
///
/// All names are lowercase as required by [`http::HeaderName::from_static`].
pub mod headers {
    use http::HeaderName;

    /// Marks a request or response as Inertia-protocol.
    pub const INERTIA: HeaderName = HeaderName::from_static("x-inertia");

    /// Client's last-seen asset version token.
    pub const VERSION: HeaderName = HeaderName::from_static("x-inertia-version");

    /// Redirect target on version conflict or external redirect.
    pub const LOCATION: HeaderName = HeaderName::from_static("x-inertia-location");

    /// Component a partial reload targets.
    pub const PARTIAL_COMPONENT: HeaderName =
        HeaderName::from_static("x-inertia-partial-component");

    /// Comma-separated keys to include on a partial reload.
    pub const PARTIAL_ONLY: HeaderName = HeaderName::from_static("x-inertia-partial-data");

    /// Comma-separated keys to exclude on a partial reload.
    pub const PARTIAL_EXCEPT: HeaderName = HeaderName::from_static("x-inertia-partial-except");

    /// Comma-separated keys the client wants replaced instead of merged.
    pub const RESET: HeaderName = HeaderName::from_static("x-inertia-reset");

    /// Names the validation error bag to surface.
    pub const ERROR_BAG: HeaderName = HeaderName::from_static("x-inertia-error-bag");
}

/// Reserved prop key that always carries validation errors.
pub const ERRORS_KEY: &str = "errors";

/// Default error bag name.
pub const DEFAULT_ERROR_BAG: &str = "default";

/// Default deferred-prop group name.
pub const DEFAULT_DEFER_GROUP: &str = "default";

/// Transient-store key holding serialized error bags.
pub const VALIDATION_ERRORS_KEY: &str = "inertia.validation_errors";

/// Transient-store key of the one-time clear-history marker.
pub const CLEAR_HISTORY_KEY: &str = "inertia.clear_history";

/// Prefix of generated keys for providers added with `with_provider`.
pub const PROVIDER_KEY_PREFIX: &str = "__provider_";
