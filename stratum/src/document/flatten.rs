use indexmap::IndexMap;

use crate::common::FIELD_SEPARATOR;
use crate::document::{Document, Value};
use crate::errors::SettingsResult;

/// A single-level mapping from full dot-path strings to leaf values.
///
/// Used as the intermediate form for reconciling defaults with overrides and
/// for multi-key reads. Entries keep insertion order.
pub type FlattenedDocument = IndexMap<String, Value>;

/// Converts a nested document into a flat mapping keyed by dot paths.
///
/// Non-empty nested documents are descended into; everything else (scalars,
/// arrays, empty documents) is emitted as a leaf under its full path. Arrays
/// are never flattened past their own key.
///
/// # Examples
///
/// ```ignore
/// let flat = flatten(&doc!{ notify: { email: true }, tags: ["a"] });
/// assert_eq!(flat.get("notify.email"), Some(&Value::Bool(true)));
/// assert!(flat.contains_key("tags"));
/// ```
pub fn flatten(document: &Document) -> FlattenedDocument {
    let mut flat = FlattenedDocument::new();
    flatten_into(document, "", &mut flat);
    flat
}

fn flatten_into(document: &Document, prefix: &str, flat: &mut FlattenedDocument) {
    for (key, value) in document.iter() {
        let path = if prefix.is_empty() {
            key
        } else {
            format!("{}{}{}", prefix, FIELD_SEPARATOR, key)
        };

        match value {
            // non-empty documents recurse, empty ones are kept as leaves
            Value::Document(nested) if !nested.is_empty() => {
                flatten_into(&nested, &path, flat);
            }
            leaf => {
                flat.insert(path, leaf);
            }
        }
    }
}

/// Rebuilds a nested document from a flat dot-path mapping.
///
/// Each flat entry is replayed through [Document::put] into a fresh document.
/// This is the exact inverse of [flatten] whenever every nested container in
/// the original was a document; arrays round-trip as opaque leaves.
pub fn unflatten(flat: &FlattenedDocument) -> SettingsResult<Document> {
    let mut document = Document::new();
    for (path, value) in flat {
        document.put(path.as_str(), value.clone())?;
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_flatten_simple() {
        let flat = flatten(&doc! { theme: "light", retries: 3 });
        assert_eq!(flat.len(), 2);
        assert_eq!(
            flat.get("theme"),
            Some(&Value::String("light".to_string()))
        );
        assert_eq!(flat.get("retries"), Some(&Value::I64(3)));
    }

    #[test]
    fn test_flatten_nested() {
        let flat = flatten(&doc! {
            notify: {
                email: true,
                channels: { sms: false },
            },
        });
        assert_eq!(flat.len(), 2);
        assert_eq!(flat.get("notify.email"), Some(&Value::Bool(true)));
        assert_eq!(flat.get("notify.channels.sms"), Some(&Value::Bool(false)));
        assert!(!flat.contains_key("notify"));
    }

    #[test]
    fn test_flatten_arrays_are_leaves() {
        let flat = flatten(&doc! { tags: ["a", "b"], outer: { list: [1, 2] } });
        assert_eq!(flat.len(), 2);
        assert!(flat.get("tags").unwrap().is_array());
        assert!(flat.get("outer.list").unwrap().is_array());
        assert!(!flat.contains_key("tags.0"));
    }

    #[test]
    fn test_flatten_empty_document_is_leaf() {
        let flat = flatten(&doc! { outer: { inner: {} } });
        assert_eq!(flat.len(), 1);
        assert_eq!(
            flat.get("outer.inner"),
            Some(&Value::Document(Document::new()))
        );
    }

    #[test]
    fn test_flatten_empty_root() {
        let flat = flatten(&Document::new());
        assert!(flat.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let original = doc! {
            theme: "light",
            notify: {
                email: true,
                channels: { sms: false },
            },
            tags: ["a", "b"],
        };

        let rebuilt = unflatten(&flatten(&original)).unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_unflatten_builds_intermediates() {
        let mut flat = FlattenedDocument::new();
        flat.insert("a.b.c".to_string(), Value::I64(1));
        flat.insert("a.b.d".to_string(), Value::I64(2));

        let document = unflatten(&flat).unwrap();
        assert_eq!(document.get("a.b.c").unwrap(), Value::I64(1));
        assert_eq!(document.get("a.b.d").unwrap(), Value::I64(2));
        assert_eq!(document.size(), 1);
    }
}
