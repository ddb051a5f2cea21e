use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A user-submitted record being moderated, validated or persisted.
///
/// No field is mandatory at the type level; which fields must be present is
/// decided per table by the field validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentItem {
    fields: BTreeMap<String, String>,
}

impl ContentItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Raw lookup: `Some` whenever the field is present, even if empty.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Lookup that treats an empty value the same as an absent one.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).filter(|v| !v.is_empty())
    }

    /// Title if present, otherwise name.
    pub fn title_or_name(&self) -> Option<&str> {
        self.text("title").or_else(|| self.text("name"))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContentItem {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
