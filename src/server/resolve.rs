//! Page resolution engine.
//!
//! Turns a component name, its raw props and the request into a [`Page`]. The
//! passes run in a fixed order, each one total over the prop map:
//!
//! 1. shared props are merged under the explicit ones
//! 2. multi-property providers are expanded in place
//! 3. partial-reload filtering (`only` then `except`, or first-load exclusion)
//! 4. always props are re-appended
//! 5. every producer is resolved, concurrently, recursing into nested maps
//! 6. merge / deep-merge / match-on / deferred metadata
//! 7. validation errors land under `errors`
//! 8. the one-time clear-history marker is consumed
//!
//! A failing producer fails the whole page; nothing is partially sent.

use super::session::{take_clear_history, take_validation_errors, TransientStore};
use super::InertiaRequest;
use crate::error::{InertiaError, Result};
use crate::props::{Prop, PropertyContext, Props, RenderContext, SharedProps};
use crate::protocol::constants::{DEFAULT_ERROR_BAG, ERRORS_KEY};
use crate::protocol::{key_in_list, to_camel_case};
use crate::types::{ErrorBags, Page, ValidationErrors};
use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Inputs of one page resolution.
pub(crate) struct PageResolver<'a> {
    pub component: &'a str,
    pub props: &'a Props,
    pub shared: Option<&'a SharedProps>,
    pub request: &'a InertiaRequest,
    pub validation_errors: &'a ValidationErrors,
    pub store: Option<&'a dyn TransientStore>,
    pub version: Option<String>,
    pub url: String,
    pub encrypt_history: bool,
    pub clear_history: bool,
}

impl PageResolver<'_> {
    /// Run every pass and assemble the page.
    pub async fn resolve(self) -> Result<Page> {
        let request = self.request;
        let component = self.component;
        let partial = request.is_partial_for(component);
        if partial {
            tracing::debug!(component, only = ?request.partial_only, except = ?request.partial_except, "partial reload");
        }

        let merged = match self.shared {
            Some(shared) => shared.get_merged(self.props),
            None => self.props.clone(),
        };
        let source = expand_providers(merged, &RenderContext { component, request });
        let filtered = filter_partial(&source, request, component);
        let selected = reinject_always(filtered, &source);
        let mut props = resolve_props(&selected, component, request).await?;

        let meta = MergeMetadata::collect(&source, &props, request, component);
        let deferred_props = if partial { None } else { deferred_groups(&source) };

        let stored = self.store.and_then(take_validation_errors);
        props.insert(
            ERRORS_KEY.to_string(),
            resolve_errors(stored, self.validation_errors, request.error_bag.as_deref()),
        );

        // consumed even when the flag is already set
        let marked = self.store.is_some_and(take_clear_history);
        let clear_history = self.clear_history || marked;

        Ok(Page {
            component: component.to_string(),
            props,
            version: self.version,
            url: self.url,
            encrypt_history: self.encrypt_history,
            clear_history,
            merge_props: meta.merge_props,
            deep_merge_props: meta.deep_merge_props,
            merge_strategies: meta.merge_strategies,
            match_props_on: meta.match_props_on,
            deferred_props,
        })
    }
}

/// Replace every multi-property provider with the props it yields.
///
/// Provided props are applied after the plain entries, in provider order, and
/// overwrite entries with the same key.
pub(crate) fn expand_providers(props: Props, ctx: &RenderContext<'_>) -> Props {
    let mut expanded = Props::new();
    let mut providers = Vec::new();
    for (key, prop) in props {
        match prop {
            Prop::Properties(provider) => providers.push(provider),
            prop => {
                expanded.insert(key, prop);
            }
        }
    }
    for provider in providers {
        expanded.extend(provider.to_inertia_properties(ctx));
    }
    expanded
}

/// Apply first-load exclusion or the `only` / `except` partial-reload lists.
pub(crate) fn filter_partial(props: &Props, request: &InertiaRequest, component: &str) -> Props {
    if !request.is_partial_for(component) {
        return props
            .iter()
            .filter(|(_, prop)| !prop.ignores_first_load())
            .map(|(key, prop)| (key, prop.clone()))
            .collect();
    }

    props
        .iter()
        .filter(|(key, _)| match &request.partial_only {
            Some(only) => key_in_list(key, only),
            None => true,
        })
        .filter(|(key, _)| match &request.partial_except {
            Some(except) => !key_in_list(key, except),
            None => true,
        })
        .map(|(key, prop)| (key, prop.clone()))
        .collect()
}

/// Move always props to the end, restoring any that filtering removed.
pub(crate) fn reinject_always(filtered: Props, source: &Props) -> Props {
    let mut props: Props = filtered.into_iter().filter(|(_, prop)| !prop.is_always()).collect();
    for (key, prop) in source.iter().filter(|(_, prop)| prop.is_always()) {
        props.insert(key, prop.clone());
    }
    props
}

/// Resolve every prop concurrently, camel-casing keys.
pub(crate) fn resolve_props<'a>(
    props: &'a Props,
    component: &'a str,
    request: &'a InertiaRequest,
) -> BoxFuture<'a, Result<Map<String, Value>>> {
    async move {
        let pending = props.iter().map(|(key, prop)| async move {
            let key = to_camel_case(key);
            let value = resolve_prop(&key, prop, props, component, request).await?;
            Ok::<_, InertiaError>((key, value))
        });
        Ok(try_join_all(pending).await?.into_iter().collect())
    }
    .boxed()
}

async fn resolve_prop(
    key: &str,
    prop: &Prop,
    props: &Props,
    component: &str,
    request: &InertiaRequest,
) -> Result<Value> {
    let invokable = match prop {
        Prop::Value(value) => return Ok(value.clone()),
        Prop::Nested(nested) => {
            return Ok(Value::Object(resolve_props(nested, component, request).await?));
        }
        Prop::Property(provider) => {
            return Ok(provider.to_inertia_property(&PropertyContext { key, props, request }));
        }
        Prop::Properties(provider) => {
            let provided = provider.to_inertia_properties(&RenderContext { component, request });
            return Ok(Value::Object(resolve_props(&provided, component, request).await?));
        }
        Prop::Callback(invokable) => invokable,
        Prop::Always(p) => p.invokable(),
        Prop::Lazy(p) => p.invokable(),
        Prop::Optional(p) => p.invokable(),
        Prop::Defer(p) => p.invokable(),
        Prop::Merge(p) => p.invokable(),
    };

    invokable.invoke().await.map_err(|err| {
        tracing::error!(key, error = %err, "prop producer failed");
        InertiaError::Resolution(err)
    })
}

/// Merge metadata sent alongside the props.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct MergeMetadata {
    pub merge_props: Option<Vec<String>>,
    pub deep_merge_props: Option<Vec<String>>,
    pub merge_strategies: Option<IndexMap<String, Vec<String>>>,
    pub match_props_on: Option<IndexMap<String, Vec<String>>>,
}

impl MergeMetadata {
    /// Collect metadata for the mergeable props of `source` that survived into `resolved`.
    pub fn collect(
        source: &Props,
        resolved: &Map<String, Value>,
        request: &InertiaRequest,
        component: &str,
    ) -> Self {
        let partial = request.is_partial_for(component);
        let mut merge_props = Vec::new();
        let mut deep_merge_props = Vec::new();
        let mut merge_strategies = IndexMap::new();
        let mut match_props_on = IndexMap::new();

        for (key, prop) in source.iter() {
            let Some(mergeable) = prop.as_mergeable() else {
                continue;
            };
            if !mergeable.should_merge() || key_in_list(key, &request.reset) {
                continue;
            }
            if partial {
                if let Some(only) = request.partial_only.as_deref() {
                    if !only.is_empty() && !key_in_list(key, only) {
                        continue;
                    }
                }
                if let Some(except) = request.partial_except.as_deref() {
                    if key_in_list(key, except) {
                        continue;
                    }
                }
            }

            let camel = to_camel_case(key);
            if !resolved.contains_key(&camel) {
                continue;
            }

            if mergeable.should_deep_merge() {
                deep_merge_props.push(camel.clone());
            }
            if let Some(strategies) = mergeable.merge_strategies() {
                merge_strategies.insert(camel.clone(), strategies.to_vec());
            }
            if let Some(match_on) = mergeable.match_on() {
                match_props_on.insert(camel.clone(), match_on.to_vec());
            }
            merge_props.push(camel);
        }

        MergeMetadata {
            merge_props: non_empty_vec(merge_props),
            deep_merge_props: non_empty_vec(deep_merge_props),
            merge_strategies: non_empty_map(merge_strategies),
            match_props_on: non_empty_map(match_props_on),
        }
    }
}

/// Deferred keys grouped by fetch group, in first-seen order.
pub(crate) fn deferred_groups(source: &Props) -> Option<IndexMap<String, Vec<String>>> {
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for (key, prop) in source.iter() {
        if let Some(group) = prop.defer_group() {
            groups.entry(group.to_string()).or_default().push(to_camel_case(key));
        }
    }
    non_empty_map(groups)
}

/// Build the `errors` prop.
///
/// Stored bags take precedence over the handler's current errors. With a bag
/// header, errors are nested under that name; a lone default bag is flattened;
/// any other combination of bags is sent whole.
pub(crate) fn resolve_errors(
    stored: Option<ErrorBags>,
    current: &ValidationErrors,
    error_bag: Option<&str>,
) -> Value {
    let Some(bags) = stored else {
        if current.is_empty() {
            return Value::Object(Map::new());
        }
        let fields = camel_fields(current.first_messages());
        return match error_bag {
            Some(bag) => nest(bag, fields),
            None => fields,
        };
    };

    if bags.is_empty() {
        return Value::Object(Map::new());
    }

    let mut bags: IndexMap<String, Value> = bags
        .into_iter()
        .map(|(name, fields)| (name, camel_fields(fields)))
        .collect();

    if let Some(requested) = error_bag {
        if let Some(default) = bags.shift_remove(DEFAULT_ERROR_BAG) {
            return nest(requested, default);
        }
        if let Some(named) = bags.shift_remove(requested) {
            return nest(requested, named);
        }
    }

    if bags.len() == 1 {
        if let Some(default) = bags.shift_remove(DEFAULT_ERROR_BAG) {
            return default;
        }
    }

    Value::Object(bags.into_iter().collect())
}

fn camel_fields(fields: IndexMap<String, String>) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(field, message)| (to_camel_case(&field), Value::String(message)))
            .collect(),
    )
}

fn nest(name: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(name.to_string(), value);
    Value::Object(map)
}

fn non_empty_vec(v: Vec<String>) -> Option<Vec<String>> {
    (!v.is_empty()).then_some(v)
}

fn non_empty_map(m: IndexMap<String, Vec<String>>) -> Option<IndexMap<String, Vec<String>>> {
    (!m.is_empty()).then_some(m)
}
