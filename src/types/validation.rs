//! Validation errors and error bags.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Error bags as stored across a redirect: bag name → field → first message.
pub type ErrorBags = IndexMap<String, IndexMap<String, String>>;

/// Field validation errors collected by a handler.
///
/// Plays the role of the framework's model state: a field may carry several
/// messages, only the first one is sent to the client.
///
/// # Examples
///
/// ```
/// use inertia_axum::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("Email", "Email is required");
/// errors.add("Email", "Email is invalid");
/// assert_eq!(errors.first_messages()["Email"], "Email is required");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.fields.entry(field.into()).or_default().push(message.into());
        self
    }

    /// Builder form of [`ValidationErrors::add`].
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    /// `true` when no field has an error.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with errors.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// All messages of a field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Field → first message, keeping field order.
    pub fn first_messages(&self) -> IndexMap<String, String> {
        self.fields
            .iter()
            .map(|(field, messages)| {
                (field.clone(), messages.first().cloned().unwrap_or_default())
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ValidationErrors
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, message) in iter {
            errors.add(field, message);
        }
        errors
    }
}
