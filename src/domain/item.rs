//! Content ingestion: both historical item shapes normalized into `FlatItem`.
//!
//! Older documents use `questions` with `q`/`signal`/`followUpIds`; newer ones
//! use `branches` with `parent` links. Everything downstream only sees
//! `FlatItem`.
//!
//! Content is hand-written JSON, so scalars are read leniently: numbers and
//! booleans become strings, other wrongly typed values count as absent.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::domain::error::{DomainError, DomainResult};

/// Raw question-tree document as stored on disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawContent {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    /// Explicit root item id
    #[serde(deserialize_with = "lenient_string")]
    pub root: Option<String>,
    /// Items stay untyped until each one is normalized on its own
    #[serde(deserialize_with = "lenient_array")]
    pub branches: Option<Vec<Value>>,
    #[serde(deserialize_with = "lenient_array")]
    pub questions: Option<Vec<Value>>,
}

/// Raw item with every accepted field alias kept separately.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawItem {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub q: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub question: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub intent: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub signal: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub expected_signal: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub parent: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub parent_id: Option<String>,
    #[serde(deserialize_with = "lenient_ids")]
    pub follow_up_ids: Option<Vec<String>>,
    pub metadata: Option<Value>,
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

/// Id lists keep their scalar entries; anything else in the list is skipped.
fn lenient_ids<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(entries) => Ok(Some(entries.iter().filter_map(scalar_text).collect())),
        _ => Ok(None),
    }
}

fn lenient_array<'de, D>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(entries) => Ok(Some(entries)),
        _ => Ok(None),
    }
}

/// Normalized input element.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatItem {
    pub id: String,
    pub text: String,
    pub intent: Option<String>,
    pub expected_signal: Option<String>,
    pub parent_id: Option<String>,
    pub follow_up_ids: Vec<String>,
    pub metadata: Option<Value>,
}

impl FlatItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            intent: None,
            expected_signal: None,
            parent_id: None,
            follow_up_ids: Vec::new(),
            metadata: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_follow_ups<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.follow_up_ids = ids.into_iter().map(Into::into).collect();
        self
    }
}

/// Empty strings count as absent, the same as a missing field.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl RawItem {
    /// Read one item of the collection; only JSON objects are items.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Self::deserialize(value).ok()
    }

    /// Map the raw aliases onto one `FlatItem`.
    ///
    /// Returns `None` for items without an id: they cannot be addressed.
    pub fn normalize(self) -> Option<FlatItem> {
        let id = present(self.id)?;
        let text = present(self.q)
            .or_else(|| present(self.question))
            .or_else(|| present(self.text))
            .unwrap_or_else(|| {
                debug!("normalize: item {} has no question text", id);
                String::new()
            });

        Some(FlatItem {
            id,
            text,
            intent: present(self.intent),
            expected_signal: present(self.signal).or_else(|| present(self.expected_signal)),
            parent_id: present(self.parent).or_else(|| present(self.parent_id)),
            follow_up_ids: self.follow_up_ids.unwrap_or_default(),
            metadata: self.metadata,
        })
    }
}

impl RawContent {
    /// Read a loosely typed JSON value into the raw document shape.
    pub fn from_value(value: &Value) -> DomainResult<Self> {
        if !value.is_object() {
            return Err(DomainError::shape("expected a JSON object"));
        }
        Self::deserialize(value).map_err(|e| DomainError::shape(format!("invalid content: {}", e)))
    }

    /// The flat item collection: `branches` when it has items, else `questions`.
    pub fn items(&self) -> DomainResult<&[Value]> {
        fn non_empty(items: &Option<Vec<Value>>) -> Option<&[Value]> {
            items.as_deref().filter(|v| !v.is_empty())
        }

        non_empty(&self.branches)
            .or_else(|| non_empty(&self.questions))
            .ok_or_else(|| DomainError::shape("neither `branches` nor `questions` holds any items"))
    }
}
