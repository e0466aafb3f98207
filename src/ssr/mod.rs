//! Server-side rendering.
//!
//! When SSR is enabled, first loads post the resolved page to a render server and
//! embed the returned `head` and `body` fragments in the root view. Any failure
//! falls back to client-side rendering.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SsrGateway`] | Render backend trait |
//! | [`HttpGateway`] | reqwest-backed gateway used by default |
//! | [`SsrResponse`] | `{head, body}` fragments |

mod gateway;

pub use gateway::{HttpGateway, SsrGateway, SsrResponse};
