use im::OrdMap;
use smallvec::SmallVec;

use crate::common::FIELD_SEPARATOR;
use crate::document::Value;
use crate::errors::{ErrorKind, SettingsError, SettingsResult};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

type FieldVec = SmallVec<[String; 8]>;

/// Represents a settings document using a lock-free persistent data structure.
///
/// A document is composed of key-value pairs. The key is always a [String]
/// and the value is a [Value].
///
/// Documents support nested documents as well. A nested location is addressed
/// by a dot path: a [String] of segments joined by the field separator (`.`).
/// For example, if a document holds `{"notify": {"sms": true}}`, the value
/// inside the nested document can be retrieved by calling
/// `document.get("notify.sms")`.
///
/// Path segments are matched literally against mapping keys. Arrays are
/// opaque leaves: dot paths never descend into them, and merging replaces
/// them wholesale.
///
/// ## Lock-Free Design
///
/// This struct uses `im::OrdMap` (a persistent ordered map):
/// - O(1) cloning via internal Arc sharing
/// - Mutations create new maps via structural sharing
/// - Each mutated document is completely independent
#[derive(Clone, PartialEq, Default)]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    /// Checks if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of top-level entries in the document.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates the specified [Value] with the specified key in this
    /// document. If the key already exists, its value is updated.
    ///
    /// The key may be a dot path (e.g. `"notify.sms"`); intermediate
    /// documents are created along the path as needed, and a non-document
    /// value sitting on an intermediate segment is replaced by a fresh
    /// nested document.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or contains an empty segment.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut doc = Document::new();
    /// doc.put("theme", "light")?;
    /// doc.put("notify.sms", true)?;
    /// assert_eq!(doc.get("notify.sms")?, Value::Bool(true));
    /// ```
    pub fn put<'a, T: Into<Value>>(
        &mut self,
        key: impl Into<Cow<'a, str>>,
        value: T,
    ) -> SettingsResult<()> {
        let key = key.into();
        // key cannot be empty
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(SettingsError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        let value = value.into();

        // if the key contains the field separator, split the segments and put
        // the value at the embedded location
        if key.contains(FIELD_SEPARATOR) {
            let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
            self.deep_put(&splits, value)
        } else {
            self.data = self.data.update(key.to_string(), value);
            Ok(())
        }
    }

    /// Returns the [Value] associated with the given key, or [Value::Null]
    /// if this document contains no mapping for it.
    ///
    /// The key may be a dot path. A missing segment anywhere along the path,
    /// or a non-document value sitting on an intermediate segment, means
    /// "not found" and yields [Value::Null] rather than an error.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let doc = doc!{ notify: { sms: true } };
    /// assert_eq!(doc.get("notify.sms")?, Value::Bool(true));
    /// assert_eq!(doc.get("notify.push")?, Value::Null);
    /// ```
    pub fn get(&self, key: &str) -> SettingsResult<Value> {
        match self.data.get(key) {
            Some(value) => Ok(value.clone()),
            None => {
                // only walk the path if the key was not found at top level
                if key.contains(FIELD_SEPARATOR) {
                    let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
                    self.recursive_get(&splits)
                } else {
                    Ok(Value::Null)
                }
            }
        }
    }

    /// Removes the key and its value from the document.
    ///
    /// The key may be a dot path. Removing a missing path succeeds without
    /// error, and a nested document emptied by the removal stays in place so
    /// ancestor structure remains intact.
    pub fn remove(&mut self, key: &str) -> SettingsResult<()> {
        if key.contains(FIELD_SEPARATOR) {
            let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
            self.deep_remove(&splits)
        } else {
            self.data = self.data.without(key);
            Ok(())
        }
    }

    /// Checks if a top level key exists in the document.
    ///
    /// This only checks top-level keys; use [Document::contains_field] for
    /// dot paths.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Checks if a top level field or embedded field exists in the document.
    ///
    /// Returns `true` for leaf values and for intermediate document nodes,
    /// so `contains_field("notify")` holds whenever `notify.sms` does.
    pub fn contains_field(&self, field: &str) -> bool {
        if self.data.contains_key(field) {
            return true;
        }
        if !field.contains(FIELD_SEPARATOR) {
            return false;
        }
        let splits: Vec<&str> = field.split(FIELD_SEPARATOR).collect();
        self.recursive_contains(&splits)
    }

    /// Retrieves all leaf field paths (top level and embedded) of this
    /// document, joined by the field separator. Arrays count as leaves.
    pub fn fields(&self) -> FieldVec {
        self.get_fields_internal("")
    }

    /// Merges another document into this one.
    ///
    /// For every key in `other`: if both sides hold documents they are merged
    /// recursively, otherwise the value from `other` wins outright (including
    /// arrays and scalars shadowing a whole document subtree). Keys present
    /// only in `self` pass through unchanged.
    ///
    /// This is the canonical overlay used to build a merged read view from a
    /// default document and a stored document.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut merged = doc!{ theme: "light", notify: { email: true, sms: false } };
    /// merged.merge(&doc!{ notify: { sms: true } });
    /// assert_eq!(merged.get("notify.email")?, Value::Bool(true));
    /// assert_eq!(merged.get("notify.sms")?, Value::Bool(true));
    /// ```
    pub fn merge(&mut self, other: &Document) {
        for (key, value) in other.data.iter() {
            if let Value::Document(incoming) = value {
                if let Some(Value::Document(mut existing)) = self.data.get(key).cloned() {
                    existing.merge(incoming);
                    self.data = self
                        .data
                        .update(key.clone(), Value::Document(existing));
                    continue;
                }
            }
            self.data = self.data.update(key.clone(), value.clone());
        }
    }

    /// Converts this document to a [BTreeMap] of its top-level entries.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Gets an iterator over the top-level key-value pairs of this document.
    pub fn iter(&self) -> DocumentIter {
        DocumentIter {
            keys: self.data.keys().cloned().collect(),
            data: self.clone(),
            index: 0,
        }
    }

    /// Decodes a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an [ErrorKind::EncodingError] if the text is not valid JSON or
    /// its top level is not an object.
    pub fn from_json(text: &str) -> SettingsResult<Document> {
        let raw: serde_json::Value = serde_json::from_str(text)?;
        match Value::from(raw) {
            Value::Document(document) => Ok(document),
            _ => {
                log::error!("JSON payload is not an object");
                Err(SettingsError::new(
                    "JSON payload is not an object",
                    ErrorKind::EncodingError,
                ))
            }
        }
    }

    /// Encodes this document as compact JSON text.
    pub fn to_json(&self) -> SettingsResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Inserts a literal top-level entry, bypassing dot-path splitting.
    /// Used when decoding payloads whose keys may legitimately contain the
    /// field separator.
    pub(crate) fn insert(&mut self, key: String, value: Value) {
        self.data = self.data.update(key, value);
    }

    fn get_fields_internal(&self, prefix: &str) -> FieldVec {
        let mut fields = FieldVec::new();

        // iterate top level keys
        for key in self.data.keys() {
            if key.is_empty() {
                continue;
            }

            let field = if prefix.is_empty() {
                // level-1 fields
                key.clone()
            } else {
                // level-n fields, joined by the field separator
                format!("{}{}{}", prefix, FIELD_SEPARATOR, key)
            };

            if let Some(Value::Document(document)) = self.data.get(key) {
                // if the value is a document, traverse its fields recursively,
                // prefixed by the field name of the document
                fields.append(&mut document.get_fields_internal(&field));
            } else {
                // no more embedded documents, add the field to the list
                fields.push(field);
            }
        }
        fields
    }

    fn recursive_get(&self, splits: &[&str]) -> SettingsResult<Value> {
        let key = splits[0];
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(SettingsError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        match self.data.get(key) {
            None => Ok(Value::Null),
            Some(value) if splits.len() == 1 => Ok(value.clone()),
            // scan to the next level with the remaining segments
            Some(Value::Document(document)) => document.recursive_get(&splits[1..]),
            // scalars and arrays are leaves, the remaining path is not found
            Some(_) => Ok(Value::Null),
        }
    }

    fn recursive_contains(&self, splits: &[&str]) -> bool {
        let key = splits[0];
        if key.is_empty() {
            return false;
        }

        match self.data.get(key) {
            None => false,
            Some(_) if splits.len() == 1 => true,
            Some(Value::Document(document)) => document.recursive_contains(&splits[1..]),
            Some(_) => false,
        }
    }

    fn deep_put(&mut self, splits: &[&str], value: Value) -> SettingsResult<()> {
        let key = splits[0];
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(SettingsError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        if splits.len() == 1 {
            // last segment, simply put in the current document
            self.data = self.data.update(key.to_string(), value);
            Ok(())
        } else {
            let mut nested = match self.data.get(key) {
                // current level is an embedded document, descend into it
                Some(Value::Document(document)) => document.clone(),
                // missing or non-document, start a fresh nested document
                _ => Document::new(),
            };
            nested.deep_put(&splits[1..], value)?;
            self.data = self
                .data
                .update(key.to_string(), Value::Document(nested));
            Ok(())
        }
    }

    fn deep_remove(&mut self, splits: &[&str]) -> SettingsResult<()> {
        let key = splits[0];
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(SettingsError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        if splits.len() == 1 {
            // last segment, simply remove from the current document
            self.data = self.data.without(key);
            Ok(())
        } else if let Some(Value::Document(document)) = self.data.get(key) {
            let mut nested = document.clone();
            nested.deep_remove(&splits[1..])?;
            // an emptied nested document stays in place, ancestor structure
            // is never pruned by a removal
            self.data = self
                .data
                .update(key.to_string(), Value::Document(nested));
            Ok(())
        } else {
            // missing intermediate segment, nothing to remove
            Ok(())
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.data.len()))?;
        for (key, value) in self.data.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        match Value::from(raw) {
            Value::Document(document) => Ok(document),
            _ => Err(serde::de::Error::custom("expected a JSON object")),
        }
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = serde_json::to_string_pretty(self).map_err(|_| std::fmt::Error)?;
        write!(f, "{}", text)
    }
}

pub struct DocumentIter {
    keys: Vec<String>,
    data: Document,
    index: usize,
}

impl Iterator for DocumentIter {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.keys.len() {
            let key = &self.keys[self.index];
            self.index += 1;
            if let Some(value) = self.data.data.get(key) {
                return Some((key.clone(), value.clone()));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.keys.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a settings [Document] with JSON-like syntax.
///
/// # Examples
///
/// ```rust
/// use stratum::doc;
///
/// // Empty document
/// let empty = doc!{};
///
/// // Simple key-value pairs
/// let simple = doc!{
///     theme: "light",
///     retries: 3
/// };
///
/// // Nested documents and arrays
/// let complex = doc!{
///     notify: {
///         email: true,
///         channels: ["sms", "push"]
///     }
/// };
/// ```
#[macro_export]
macro_rules! doc {
    // match an empty document (with braces)
    ({}) => {
        $crate::document::Document::new()
    };

    // match an empty document
    () => {
        $crate::document::Document::new()
    };

    // match a document with key value pairs (outer braces)
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    // match a document with key value pairs
    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::document::Document::new();
            $(
                doc.put(&$crate::document::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the doc! macro.
/// Handles nested documents, arrays, and expressions.
#[macro_export]
macro_rules! doc_value {
    // match a nested document
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::document::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    // match an array of values
    ([ $($value:tt),* $(,)? ]) => {
        $crate::document::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    // match an expression (variable, function call, literals, etc.)
    ($value:expr) => {
        $crate::document::Value::from($value)
    };
}
