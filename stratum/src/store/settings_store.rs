use crate::document::{flatten, unflatten, Document, FlattenedDocument, Value};
use crate::errors::SettingsResult;
use crate::store::SettingsSink;

/// A hierarchical key/value settings store over one settings field of a host
/// entity.
///
/// # Purpose
/// Owns the field's default document and a [SettingsSink], and exposes the
/// public read/write contract. Every read operates on the canonical merged
/// view: the stored document recursively overlaid onto the defaults, where a
/// stored key wins at every depth and default-only keys pass through.
///
/// # Write model
/// Every mutating call loads the stored document through the sink, applies
/// the change to a working copy, and commits the whole copy with a single
/// `apply` call. Defaults are a read-time overlay only and are never
/// persisted. There is no in-place incremental persistence.
///
/// # Examples
///
/// ```ignore
/// let mut store = registry.default_store()?;
/// store.set("notify.sms", true)?;
/// assert_eq!(store.get("notify.sms")?, Value::Bool(true));
/// ```
pub struct SettingsStore {
    field: String,
    defaults: Document,
    sink: Box<dyn SettingsSink>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("field", &self.field)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl SettingsStore {
    pub(crate) fn new(field: &str, defaults: Document, sink: Box<dyn SettingsSink>) -> Self {
        SettingsStore {
            field: field.to_string(),
            defaults,
            sink,
        }
    }

    /// The settings field this store reads and writes.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the canonical merged view: the stored document recursively
    /// overlaid onto the default document.
    pub fn all(&self) -> SettingsResult<Document> {
        let mut merged = self.defaults.clone();
        merged.merge(&self.sink.load()?);
        Ok(merged)
    }

    /// Returns the merged view as a flat dot-path mapping.
    ///
    /// Both documents are flattened first and then unioned last-writer-wins,
    /// so a stored non-document override at a path does not shadow default
    /// leaves nested under the same path the way [SettingsStore::all] does.
    pub fn all_flattened(&self) -> SettingsResult<FlattenedDocument> {
        let mut flat = flatten(&self.defaults);
        flat.extend(flatten(&self.sink.load()?));
        Ok(flat)
    }

    /// Whether the merged view has any top-level keys.
    pub fn exists(&self) -> SettingsResult<bool> {
        Ok(self.all()?.size() > 0)
    }

    /// Whether the merged view is empty.
    pub fn is_empty(&self) -> SettingsResult<bool> {
        Ok(self.all()?.is_empty())
    }

    /// Checks if a dot path exists in the merged view.
    pub fn has(&self, path: &str) -> SettingsResult<bool> {
        Ok(self.all()?.contains_field(path))
    }

    /// Gets the value at a dot path from the merged view, or [Value::Null]
    /// if the path is absent.
    pub fn get(&self, path: &str) -> SettingsResult<Value> {
        self.all()?.get(path)
    }

    /// Gets the value at a dot path from the merged view, or `default` if
    /// the path is absent.
    pub fn get_or(&self, path: &str, default: Value) -> SettingsResult<Value> {
        let merged = self.all()?;
        if merged.contains_field(path) {
            merged.get(path)
        } else {
            Ok(default)
        }
    }

    /// Gets several dot paths at once as a nested document.
    ///
    /// The merged view is rebuilt by round-tripping the flattened form, so
    /// this sees the same picture as [SettingsStore::all_flattened]. With
    /// `None` the whole rebuilt view is returned; otherwise only the
    /// requested paths are set into a fresh document, with absent paths
    /// defaulting to `default`.
    pub fn get_multiple(
        &self,
        paths: Option<&[&str]>,
        default: Value,
    ) -> SettingsResult<Document> {
        let rebuilt = unflatten(&self.all_flattened()?)?;
        let paths = match paths {
            Some(paths) => paths,
            None => return Ok(rebuilt),
        };

        let mut picked = Document::new();
        for path in paths {
            let value = if rebuilt.contains_field(path) {
                rebuilt.get(path)?
            } else {
                default.clone()
            };
            picked.put(*path, value)?;
        }
        Ok(picked)
    }

    /// Sets the value at a dot path and persists the stored document.
    ///
    /// The working copy starts from the stored document, so defaults are
    /// never written back; the overlay keeps supplying them at read time.
    pub fn set<T: Into<Value>>(&mut self, path: &str, value: T) -> SettingsResult<()> {
        let mut working = self.sink.load()?;
        working.put(path, value)?;
        self.sink.apply(&working)
    }

    /// Alias for [SettingsStore::set].
    pub fn update<T: Into<Value>>(&mut self, path: &str, value: T) -> SettingsResult<()> {
        self.set(path, value)
    }

    /// Deletes the value at a dot path and persists the stored document.
    /// Deleting a path that only defaults supply is a no-op: defaults cannot
    /// be removed, only overridden.
    pub fn delete(&mut self, path: &str) -> SettingsResult<()> {
        let mut working = self.sink.load()?;
        working.remove(path)?;
        self.sink.apply(&working)
    }

    /// Clears the stored document entirely. Reads fall back to defaults.
    pub fn clear(&mut self) -> SettingsResult<()> {
        self.sink.apply(&Document::new())
    }

    /// Applies several path/value pairs in one persistence round-trip.
    pub fn set_multiple<K, V, I>(&mut self, values: I) -> SettingsResult<()>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut working = self.sink.load()?;
        for (path, value) in values {
            working.put(path.as_ref(), value)?;
        }
        // a single apply commits the whole batch
        self.sink.apply(&working)
    }

    /// Deletes several dot paths in one persistence round-trip.
    pub fn delete_multiple<K, I>(&mut self, paths: I) -> SettingsResult<()>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = K>,
    {
        let mut working = self.sink.load()?;
        for path in paths {
            working.remove(path.as_ref())?;
        }
        self.sink.apply(&working)
    }
}
