//! Per-request shared props.
//!
//! Any code that touches the request (middleware, extractors, handlers) can share
//! props that are merged into the page rendered for that request. Keys are
//! case-insensitive; explicitly rendered props win on collision.

use super::{Prop, Props};
use http::Extensions;
use parking_lot::Mutex;
use std::sync::Arc;

/// Per-request shared props store.
///
/// Cloning yields a handle to the same store. The store lives in the request's
/// extensions and is created on first use.
///
/// # Examples
///
/// ```
/// use inertia_axum::props::{Props, SharedProps};
///
/// let shared = SharedProps::new();
/// shared.set("appName", "Demo");
/// shared.set("AppName", "Renamed");
///
/// let merged = shared.get_merged(&Props::new().with("title", "Home"));
/// assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["title", "AppName"]);
/// ```
#[derive(Clone, Default)]
pub struct SharedProps {
    inner: Arc<Mutex<Props>>,
}

impl SharedProps {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The request's store, inserted into `extensions` if missing.
    pub fn from_extensions(extensions: &mut Extensions) -> Self {
        if let Some(shared) = extensions.get::<SharedProps>() {
            return shared.clone();
        }
        let shared = SharedProps::new();
        extensions.insert(shared.clone());
        shared
    }

    /// Share one prop, overwriting any key that differs only by case.
    pub fn set(&self, key: impl Into<String>, prop: impl Into<Prop>) {
        let key = key.into();
        let prop = prop.into();
        let mut props = self.inner.lock();

        let existing = props.keys().find(|k| k.eq_ignore_ascii_case(&key)).map(str::to_string);
        match existing {
            Some(existing) if existing == key => {
                props.insert(key, prop);
            }
            Some(existing) => {
                // re-key at the old position
                let mut rebuilt = Props::new();
                for (k, v) in std::mem::take(&mut *props) {
                    if k == existing {
                        rebuilt.insert(key.clone(), prop.clone());
                    } else {
                        rebuilt.insert(k, v);
                    }
                }
                *props = rebuilt;
            }
            None => {
                props.insert(key, prop);
            }
        }
    }

    /// Share every prop of `props`.
    pub fn merge(&self, props: Props) {
        for (key, prop) in props {
            self.set(key, prop);
        }
    }

    /// `base` followed by the shared props whose keys `base` lacks.
    pub fn get_merged(&self, base: &Props) -> Props {
        let shared = self.inner.lock();
        let mut merged = base.clone();
        for (key, prop) in shared.iter() {
            if !base.contains_key_ignore_case(key) {
                merged.insert(key, prop.clone());
            }
        }
        merged
    }

    /// Drop every shared prop.
    pub fn clear(&self) {
        *self.inner.lock() = Props::new();
    }

    /// Number of shared props.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// `true` when nothing is shared.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl std::fmt::Debug for SharedProps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedProps").field("props", &*self.inner.lock()).finish()
    }
}
