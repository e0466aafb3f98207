//! Axum integration.
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`InertiaLayer`] | Middleware: version gate, empty-body guard, request state |
//! | [`Inertia`] | Handler extractor: render, share, redirect |
//! | [`InertiaResponse`] | Render in progress, awaited into a JSON or HTML response |
//! | [`InertiaRequest`] | Parsed Inertia request headers |
//! | [`InertiaConfig`] | Adapter configuration |
//! | [`Back`] / [`Location`] | Redirect helpers |
//! | [`TransientStore`] | One-time storage backing error bags across redirects |
//! | [`RootView`] | First-load HTML document renderer |

mod config;
mod extract;
mod middleware;
mod pages;
mod redirect;
mod request;
mod resolve;
mod response;
mod session;
mod state;
mod view;

pub use config::InertiaConfig;
pub use extract::Inertia;
pub use middleware::InertiaLayer;
pub use pages::{component_candidates, ensure_component_exists};
pub use redirect::{Back, Location};
pub use request::InertiaRequest;
pub use response::InertiaResponse;
pub use session::{
    mark_clear_history, store_validation_errors, take_clear_history, take_validation_errors,
    MemoryStore, TransientStore, TransientStoreHandle,
};
pub use state::{InertiaState, InertiaVersion, UrlResolver};
pub use view::{html_fragment, RootView, TemplateRootView, ViewContext};
