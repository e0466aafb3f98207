//! The page object sent to the Inertia client.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire payload for one render.
///
/// Serialized with camelCase field names. The optional merge and defer metadata
/// fields are omitted entirely when absent, never sent as empty containers.
///
/// # Example
///
/// ```
/// use inertia_axum::Page;
///
/// let page = Page::new("Users/Index", "/users");
/// let json = serde_json::to_value(&page).unwrap();
/// assert_eq!(json["component"], "Users/Index");
/// assert!(json.get("mergeProps").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Front-end component name
    pub component: String,

    /// Resolved props, camelCase keys in insertion order
    pub props: Map<String, Value>,

    /// Asset version token
    pub version: Option<String>,

    /// Canonical URL of the page
    pub url: String,

    /// Whether the client should encrypt this history entry
    pub encrypt_history: bool,

    /// Whether the client should clear its encrypted history
    pub clear_history: bool,

    /// Keys the client merges into its cached value instead of replacing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_props: Option<Vec<String>>,

    /// Mergeable keys that are merged recursively
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_merge_props: Option<Vec<String>>,

    /// Explicit merge strategy tags per key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_strategies: Option<IndexMap<String, Vec<String>>>,

    /// Identity keys used to reconcile merged arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_props_on: Option<IndexMap<String, Vec<String>>>,

    /// Deferred keys grouped by fetch group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferred_props: Option<IndexMap<String, Vec<String>>>,
}

impl Page {
    /// Create an empty page for a component.
    pub fn new(component: impl Into<String>, url: impl Into<String>) -> Self {
        Page {
            component: component.into(),
            props: Map::new(),
            version: None,
            url: url.into(),
            encrypt_history: false,
            clear_history: false,
            merge_props: None,
            deep_merge_props: None,
            merge_strategies: None,
            match_props_on: None,
            deferred_props: None,
        }
    }

    /// Serialize the page as a JSON string.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_names_are_camel_case() {
        let mut page = Page::new("Test/Page", "/test");
        page.version = Some("v1".into());
        page.encrypt_history = true;

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            json!({
                "component": "Test/Page",
                "props": {},
                "version": "v1",
                "url": "/test",
                "encryptHistory": true,
                "clearHistory": false,
            })
        );
    }

    #[test]
    fn test_metadata_present_when_set() {
        let mut page = Page::new("Test/Page", "/test");
        page.merge_props = Some(vec!["testMerge".into()]);
        let mut groups = IndexMap::new();
        groups.insert("g1".to_string(), vec!["key".to_string()]);
        page.deferred_props = Some(groups);

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["mergeProps"], json!(["testMerge"]));
        assert_eq!(json["deferredProps"], json!({ "g1": ["key"] }));
        assert!(json.get("mergeStrategies").is_none());
    }

    #[test]
    fn test_props_keep_insertion_order() {
        let mut page = Page::new("Test/Page", "/");
        page.props.insert("zeta".into(), json!(1));
        page.props.insert("alpha".into(), json!(2));

        let encoded = page.to_json().unwrap();
        assert!(encoded.find("zeta").unwrap() < encoded.find("alpha").unwrap());
    }
}
