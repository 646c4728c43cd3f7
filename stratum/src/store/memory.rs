use std::collections::HashMap;

use crate::common::DEFAULT_SETTINGS_FIELD;
use crate::document::Document;
use crate::errors::SettingsResult;
use crate::store::SettingsHost;

/// An in-memory [SettingsHost] implementation.
///
/// # Purpose
/// Backs settings stores with plain maps instead of a persistent record.
/// Useful in tests and as a reference host implementation: it exposes the
/// raw payloads it holds and counts field writes and entity saves, so
/// persistence round-trips can be observed directly.
///
/// # Examples
///
/// ```ignore
/// let host = MemoryHost::new()
///     .with_field("preferences", doc!{ theme: "light" }, doc!{ theme: "in:light,dark" })
///     .default_field("preferences");
/// ```
pub struct MemoryHost {
    values: HashMap<String, String>,
    defaults: HashMap<String, Document>,
    rules: HashMap<String, Document>,
    registered: Vec<String>,
    default_field: String,
    auto_persist: bool,
    write_count: usize,
    save_count: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        MemoryHost {
            values: HashMap::new(),
            defaults: HashMap::new(),
            rules: HashMap::new(),
            registered: Vec::new(),
            default_field: DEFAULT_SETTINGS_FIELD.to_string(),
            auto_persist: true,
            write_count: 0,
            save_count: 0,
        }
    }

    /// Registers a settings field with its default document and rule set.
    pub fn with_field(mut self, field: &str, defaults: Document, rules: Document) -> Self {
        self.registered.push(field.to_string());
        self.defaults.insert(field.to_string(), defaults);
        self.rules.insert(field.to_string(), rules);
        self
    }

    /// Declares which registered field is the default one.
    pub fn default_field(mut self, field: &str) -> Self {
        self.default_field = field.to_string();
        self
    }

    /// Controls whether field writes also save the entity.
    pub fn auto_persist(mut self, flag: bool) -> Self {
        self.auto_persist = flag;
        self
    }

    /// Pre-populates the raw payload of a field, bypassing validation.
    /// Accepts any text, including corrupt payloads.
    pub fn seed(mut self, field: &str, payload: &str) -> Self {
        self.values.insert(field.to_string(), payload.to_string());
        self
    }

    /// The raw payload currently held for a field, if any.
    pub fn raw_value(&self, field: &str) -> Option<&String> {
        self.values.get(field)
    }

    /// Number of field writes performed so far.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    /// Number of entity saves performed so far.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        MemoryHost::new()
    }
}

impl SettingsHost for MemoryHost {
    fn settings_fields(&self) -> Vec<String> {
        self.registered.clone()
    }

    fn default_settings_field(&self) -> String {
        self.default_field.clone()
    }

    fn read_field(&self, field: &str) -> SettingsResult<Option<String>> {
        Ok(self.values.get(field).cloned())
    }

    fn write_field(&mut self, field: &str, payload: &str) -> SettingsResult<()> {
        self.write_count += 1;
        self.values.insert(field.to_string(), payload.to_string());
        Ok(())
    }

    fn default_document(&self, field: &str) -> Document {
        self.defaults.get(field).cloned().unwrap_or_default()
    }

    fn rules(&self, field: &str) -> Document {
        self.rules.get(field).cloned().unwrap_or_default()
    }

    fn persist_on_write(&self) -> bool {
        self.auto_persist
    }

    fn save(&mut self) -> SettingsResult<()> {
        self.save_count += 1;
        Ok(())
    }
}
