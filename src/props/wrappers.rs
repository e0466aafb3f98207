//! Prop wrapper kinds.
//!
//! | Wrapper | First load | Partial reload | Merge metadata |
//! |---------|------------|----------------|----------------|
//! | [`AlwaysProp`] | included | always included | no |
//! | [`LazyProp`] / [`OptionalProp`] | excluded | only when requested | no |
//! | [`DeferProp`] | excluded, listed in `deferredProps` | only when requested | opt-in |
//! | [`MergeProp`] | included | normal filtering | yes |

use crate::protocol::constants::DEFAULT_DEFER_GROUP;
use super::Invokable;

/// Merge flags shared by mergeable wrappers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    merge: bool,
    deep: bool,
    match_on: Option<Vec<String>>,
    strategies: Option<Vec<String>>,
}

/// Props the client merges into its cached value instead of replacing it.
///
/// `match_on` and the deep flag are independent: identity keys apply to array
/// reconciliation at any depth.
pub trait Mergeable {
    /// Merge flags of this prop.
    fn merge_options(&self) -> &MergeOptions;

    /// Mutable merge flags of this prop.
    fn merge_options_mut(&mut self) -> &mut MergeOptions;

    /// Mark the prop as mergeable.
    #[must_use]
    fn merge(mut self) -> Self
    where
        Self: Sized,
    {
        self.merge_options_mut().merge = true;
        self
    }

    /// Mark the prop as deep-mergeable (implies mergeable).
    #[must_use]
    fn deep_merge(mut self) -> Self
    where
        Self: Sized,
    {
        let options = self.merge_options_mut();
        options.merge = true;
        options.deep = true;
        self
    }

    /// Identity keys used to reconcile merged arrays.
    #[must_use]
    fn matches_on<I, S>(mut self, keys: I) -> Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.merge_options_mut().match_on = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Explicit merge strategy tags (e.g. `"deep"`, `"shallow"`, `"replace"`).
    #[must_use]
    fn with_strategies<I, S>(mut self, strategies: I) -> Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.merge_options_mut().strategies =
            Some(strategies.into_iter().map(Into::into).collect());
        self
    }

    /// Whether the client should merge this prop.
    fn should_merge(&self) -> bool {
        self.merge_options().merge
    }

    /// Whether the merge is recursive.
    fn should_deep_merge(&self) -> bool {
        self.merge_options().deep
    }

    /// Identity keys, if any.
    fn match_on(&self) -> Option<&[String]> {
        self.merge_options().match_on.as_deref()
    }

    /// Strategy tags, if any.
    fn merge_strategies(&self) -> Option<&[String]> {
        self.merge_options().strategies.as_deref()
    }
}

/// Included on every response, whatever the partial-reload headers say.
#[derive(Debug, Clone)]
pub struct AlwaysProp {
    value: Invokable,
}

impl AlwaysProp {
    /// Wrap a value or producer.
    pub fn new(value: impl Into<Invokable>) -> Self {
        Self { value: value.into() }
    }

    /// Payload of the prop.
    #[inline]
    pub fn invokable(&self) -> &Invokable {
        &self.value
    }
}

/// Excluded from the first load; sent only when named in a partial reload.
#[derive(Debug, Clone)]
pub struct LazyProp {
    callback: Invokable,
}

impl LazyProp {
    /// Wrap a value or producer.
    pub fn new(callback: impl Into<Invokable>) -> Self {
        Self {
            callback: callback.into(),
        }
    }

    /// Payload of the prop.
    #[inline]
    pub fn invokable(&self) -> &Invokable {
        &self.callback
    }
}

/// Same semantics as [`LazyProp`], under the name newer clients use.
#[derive(Debug, Clone)]
pub struct OptionalProp {
    callback: Invokable,
}

impl OptionalProp {
    /// Wrap a value or producer.
    pub fn new(callback: impl Into<Invokable>) -> Self {
        Self {
            callback: callback.into(),
        }
    }

    /// Payload of the prop.
    #[inline]
    pub fn invokable(&self) -> &Invokable {
        &self.callback
    }
}

/// Excluded from the first load and fetched by the client right after it, in groups.
///
/// # Examples
///
/// ```
/// use inertia_axum::props::{DeferProp, Invokable, Mergeable};
///
/// let prop = DeferProp::new(Invokable::from_fn(|| vec!["a", "b"]), Some("sidebar")).merge();
/// assert_eq!(prop.group(), "sidebar");
/// assert!(prop.should_merge());
/// ```
#[derive(Debug, Clone)]
pub struct DeferProp {
    callback: Invokable,
    group: String,
    merge: MergeOptions,
}

impl DeferProp {
    /// Wrap a value or producer; `None` selects the `"default"` group.
    pub fn new(callback: impl Into<Invokable>, group: Option<&str>) -> Self {
        Self {
            callback: callback.into(),
            group: group.unwrap_or(DEFAULT_DEFER_GROUP).to_string(),
            merge: MergeOptions::default(),
        }
    }

    /// Fetch group name.
    #[inline]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Payload of the prop.
    #[inline]
    pub fn invokable(&self) -> &Invokable {
        &self.callback
    }
}

impl Mergeable for DeferProp {
    fn merge_options(&self) -> &MergeOptions {
        &self.merge
    }

    fn merge_options_mut(&mut self) -> &mut MergeOptions {
        &mut self.merge
    }
}

/// Appended to (or reconciled with) the client's cached value for the key.
#[derive(Debug, Clone)]
pub struct MergeProp {
    value: Invokable,
    merge: MergeOptions,
}

impl MergeProp {
    /// Shallow-merge prop.
    pub fn new(value: impl Into<Invokable>) -> Self {
        Self {
            value: value.into(),
            merge: MergeOptions {
                merge: true,
                ..MergeOptions::default()
            },
        }
    }

    /// Deep-merge prop.
    pub fn deep(value: impl Into<Invokable>) -> Self {
        Self::new(value).deep_merge()
    }

    /// Payload of the prop.
    #[inline]
    pub fn invokable(&self) -> &Invokable {
        &self.value
    }
}

impl Mergeable for MergeProp {
    fn merge_options(&self) -> &MergeOptions {
        &self.merge
    }

    fn merge_options_mut(&mut self) -> &mut MergeOptions {
        &mut self.merge
    }
}
