//! Core Inertia data types.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Page`] | Wire payload sent as JSON or embedded in the root view |
//! | [`ValidationErrors`] | Field errors collected by a handler |
//! | [`ErrorBags`] | Named error partitions persisted across a redirect |

mod page;
mod validation;

pub use page::Page;
pub use validation::{ErrorBags, ValidationErrors};
