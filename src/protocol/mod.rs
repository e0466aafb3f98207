//! Inertia protocol constants and header helpers.
//!
//! | Header | Direction | Meaning |
//! |--------|-----------|---------|
//! | `X-Inertia` | req/resp | marks request/response as Inertia-protocol |
//! | `X-Inertia-Version` | req | client's last-seen version token |
//! | `X-Inertia-Location` | resp | redirect target on version conflict |
//! | `X-Inertia-Partial-Component` | req | component a partial reload targets |
//! | `X-Inertia-Partial-Data` | req | keys to include |
//! | `X-Inertia-Partial-Except` | req | keys to exclude |
//! | `X-Inertia-Reset` | req | keys to force-exclude from merge |
//! | `X-Inertia-Error-Bag` | req | validation error bag to surface |

pub mod constants;
mod headers;

pub use headers::{key_in_list, parse_inertia_flag, parse_key_list, to_camel_case};
