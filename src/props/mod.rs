//! Page props: values, producers, providers and wrapper kinds.
//!
//! A [`Props`] map holds one [`Prop`] per key, in insertion order. The resolution
//! pipeline inspects each prop's kind to decide whether it is sent, and turns
//! every producer into its value.
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Prop`] | Tagged union over every kind of prop |
//! | [`Props`] | Ordered key → prop map |
//! | [`Invokable`] | Value or sync/async producer |
//! | [`SharedProps`] | Per-request props merged into every response |
//!
//! # Examples
//!
//! ```
//! use inertia_axum::props::{Invokable, Mergeable, Prop, Props};
//!
//! let props = Props::new()
//!     .with("title", "Users")
//!     .with("users", Prop::from_async(|| async { vec!["ada", "grace"] }))
//!     .with("stats", Prop::lazy(Invokable::from_fn(|| 42)))
//!     .with("feed", Prop::merge_prop(Invokable::from_fn(|| vec![1, 2])).matches_on(["id"]))
//!     .with("auth", Prop::always("token"));
//! assert_eq!(props.len(), 5);
//! ```

mod invokable;
mod providers;
mod shared;
mod wrappers;

pub use invokable::Invokable;
pub use providers::{
    PropertyContext, ProvidesInertiaProperties, ProvidesInertiaProperty, RenderContext,
};
pub use shared::SharedProps;
pub use wrappers::{
    AlwaysProp, DeferProp, LazyProp, MergeOptions, MergeProp, Mergeable, OptionalProp,
};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// One page prop.
#[derive(Clone)]
pub enum Prop {
    /// Plain value
    Value(Value),
    /// Zero-argument producer
    Callback(Invokable),
    /// Nested map, resolved recursively
    Nested(Props),
    /// Single-value provider
    Property(Arc<dyn ProvidesInertiaProperty>),
    /// Multi-property provider, expanded before filtering
    Properties(Arc<dyn ProvidesInertiaProperties>),
    /// See [`AlwaysProp`]
    Always(AlwaysProp),
    /// See [`LazyProp`]
    Lazy(LazyProp),
    /// See [`OptionalProp`]
    Optional(OptionalProp),
    /// See [`DeferProp`]
    Defer(DeferProp),
    /// See [`MergeProp`]
    Merge(MergeProp),
}

impl Prop {
    /// Infallible synchronous producer.
    pub fn from_fn<F, T>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Serialize,
    {
        Prop::Callback(Invokable::from_fn(f))
    }

    /// Fallible synchronous producer.
    pub fn try_from_fn<F, T>(f: F) -> Self
    where
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
        T: Serialize,
    {
        Prop::Callback(Invokable::try_from_fn(f))
    }

    /// Infallible asynchronous producer.
    pub fn from_async<F, Fut, T>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize,
    {
        Prop::Callback(Invokable::from_async(f))
    }

    /// Fallible asynchronous producer.
    pub fn try_from_async<F, Fut, T>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Serialize,
    {
        Prop::Callback(Invokable::try_from_async(f))
    }

    /// Serialize any value up front.
    pub fn serialize<T: Serialize>(value: &T) -> crate::Result<Self> {
        Ok(Prop::Value(serde_json::to_value(value)?))
    }

    /// Single-value provider.
    pub fn provider(provider: impl ProvidesInertiaProperty + 'static) -> Self {
        Prop::Property(Arc::new(provider))
    }

    /// Multi-property provider.
    pub fn properties(provider: impl ProvidesInertiaProperties + 'static) -> Self {
        Prop::Properties(Arc::new(provider))
    }

    /// Always included.
    pub fn always(value: impl Into<Invokable>) -> Self {
        Prop::Always(AlwaysProp::new(value))
    }

    /// Excluded unless requested.
    pub fn lazy(callback: impl Into<Invokable>) -> Self {
        Prop::Lazy(LazyProp::new(callback))
    }

    /// Excluded unless requested.
    pub fn optional(callback: impl Into<Invokable>) -> Self {
        Prop::Optional(OptionalProp::new(callback))
    }

    /// Deferred to a follow-up request, in the `"default"` group.
    pub fn defer(callback: impl Into<Invokable>) -> Self {
        Prop::Defer(DeferProp::new(callback, None))
    }

    /// Deferred to a follow-up request, in a named group.
    pub fn defer_in(callback: impl Into<Invokable>, group: &str) -> Self {
        Prop::Defer(DeferProp::new(callback, Some(group)))
    }

    /// Shallow merge.
    pub fn merge(value: impl Into<Invokable>) -> Self {
        Prop::Merge(MergeProp::new(value))
    }

    /// Shallow merge with strategy tags.
    pub fn merge_with<I, S>(value: impl Into<Invokable>, strategies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Prop::Merge(MergeProp::new(value).with_strategies(strategies))
    }

    /// Deep merge.
    pub fn deep_merge(value: impl Into<Invokable>) -> Self {
        Prop::Merge(MergeProp::deep(value))
    }

    /// Deep merge with strategy tags.
    pub fn deep_merge_with<I, S>(value: impl Into<Invokable>, strategies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Prop::Merge(MergeProp::deep(value).with_strategies(strategies))
    }

    /// Merge wrapper for further configuration, see [`Mergeable`].
    pub fn merge_prop(value: impl Into<Invokable>) -> MergeProp {
        MergeProp::new(value)
    }

    /// Always-included prop.
    #[inline]
    pub fn is_always(&self) -> bool {
        matches!(self, Prop::Always(_))
    }

    /// Excluded from the first load.
    #[inline]
    pub fn ignores_first_load(&self) -> bool {
        matches!(self, Prop::Lazy(_) | Prop::Optional(_) | Prop::Defer(_))
    }

    /// Merge flags, for wrappers that carry them.
    pub fn as_mergeable(&self) -> Option<&dyn Mergeable> {
        match self {
            Prop::Merge(p) => Some(p),
            Prop::Defer(p) => Some(p),
            _ => None,
        }
    }

    /// Defer group, for deferred props.
    pub fn defer_group(&self) -> Option<&str> {
        match self {
            Prop::Defer(p) => Some(p.group()),
            _ => None,
        }
    }
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Prop::Callback(c) => f.debug_tuple("Callback").field(c).finish(),
            Prop::Nested(p) => f.debug_tuple("Nested").field(p).finish(),
            Prop::Property(_) => f.write_str("Property(..)"),
            Prop::Properties(_) => f.write_str("Properties(..)"),
            Prop::Always(p) => f.debug_tuple("Always").field(p).finish(),
            Prop::Lazy(p) => f.debug_tuple("Lazy").field(p).finish(),
            Prop::Optional(p) => f.debug_tuple("Optional").field(p).finish(),
            Prop::Defer(p) => f.debug_tuple("Defer").field(p).finish(),
            Prop::Merge(p) => f.debug_tuple("Merge").field(p).finish(),
        }
    }
}

impl From<Value> for Prop {
    fn from(v: Value) -> Self {
        Prop::Value(v)
    }
}

impl From<&str> for Prop {
    fn from(v: &str) -> Self {
        Prop::Value(Value::from(v))
    }
}

impl From<String> for Prop {
    fn from(v: String) -> Self {
        Prop::Value(Value::from(v))
    }
}

impl From<bool> for Prop {
    fn from(v: bool) -> Self {
        Prop::Value(Value::from(v))
    }
}

impl From<i64> for Prop {
    fn from(v: i64) -> Self {
        Prop::Value(Value::from(v))
    }
}

impl From<f64> for Prop {
    fn from(v: f64) -> Self {
        Prop::Value(Value::from(v))
    }
}

impl From<Invokable> for Prop {
    fn from(v: Invokable) -> Self {
        Prop::Callback(v)
    }
}

impl From<Props> for Prop {
    fn from(v: Props) -> Self {
        Prop::Nested(v)
    }
}

impl From<AlwaysProp> for Prop {
    fn from(v: AlwaysProp) -> Self {
        Prop::Always(v)
    }
}

impl From<LazyProp> for Prop {
    fn from(v: LazyProp) -> Self {
        Prop::Lazy(v)
    }
}

impl From<OptionalProp> for Prop {
    fn from(v: OptionalProp) -> Self {
        Prop::Optional(v)
    }
}

impl From<DeferProp> for Prop {
    fn from(v: DeferProp) -> Self {
        Prop::Defer(v)
    }
}

impl From<MergeProp> for Prop {
    fn from(v: MergeProp) -> Self {
        Prop::Merge(v)
    }
}

/// Ordered key → prop map.
///
/// Keys are stored as given; they are normalized to camelCase when the page is
/// resolved.
#[derive(Clone, Default)]
pub struct Props {
    entries: IndexMap<String, Prop>,
}

impl Props {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, prop: impl Into<Prop>) -> Self {
        self.insert(key, prop);
        self
    }

    /// Insert or overwrite a prop, returning the previous one.
    ///
    /// Overwriting keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, prop: impl Into<Prop>) -> Option<Prop> {
        self.entries.insert(key.into(), prop.into())
    }

    /// Remove a prop, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Prop> {
        self.entries.shift_remove(key)
    }

    /// Look up a prop by exact key.
    pub fn get(&self, key: &str) -> Option<&Prop> {
        self.entries.get(key)
    }

    /// Whether the exact key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether a key is present, ignoring ASCII case.
    pub fn contains_key_ignore_case(&self, key: &str) -> bool {
        self.entries.keys().any(|k| k.eq_ignore_ascii_case(key))
    }

    /// Number of props.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Prop)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Insert every prop of `other`, overwriting on key collision.
    pub fn extend(&mut self, other: Props) {
        self.entries.extend(other.entries);
    }

    /// Build props from any value that serializes to a JSON object.
    ///
    /// ```
    /// use inertia_axum::props::Props;
    ///
    /// #[derive(serde::Serialize)]
    /// struct Index { title: &'static str, count: u32 }
    ///
    /// let props = Props::from_serialize(&Index { title: "Users", count: 2 }).unwrap();
    /// assert!(props.contains_key("title"));
    /// ```
    pub fn from_serialize<T: Serialize>(value: &T) -> crate::Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(map.into_iter().collect()),
            Value::Null => Ok(Props::new()),
            other => Err(crate::InertiaError::Config(format!(
                "props must serialize to an object, got {}",
                other
            ))),
        }
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K, P> FromIterator<(K, P)> for Props
where
    K: Into<String>,
    P: Into<Prop>,
{
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (key, prop) in iter {
            props.insert(key, prop);
        }
        props
    }
}

impl IntoIterator for Props {
    type Item = (String, Prop);
    type IntoIter = indexmap::map::IntoIter<String, Prop>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
