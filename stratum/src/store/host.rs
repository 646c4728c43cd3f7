use crate::common::DEFAULT_SETTINGS_FIELD;
use crate::document::Document;
use crate::errors::SettingsResult;

/// Capability contract an owning entity must implement to expose settings
/// fields.
///
/// # Purpose
/// A host entity (typically a persistent record) stores one or more settings
/// documents as raw JSON payloads in named fields. This trait makes that
/// relationship explicit: it declares which fields exist, supplies per-field
/// defaults and validation rules, and provides raw read/write access plus an
/// entity-level save hook.
///
/// # Usage
/// Implemented by host records (see `MemoryHost` for an in-memory example).
/// Client code never calls these methods directly; it goes through a
/// `SettingsRegistry`, which resolves field names to stores at acquisition
/// time.
pub trait SettingsHost {
    /// Returns the names of all registered settings fields. Requests for any
    /// other name fail with a configuration error before any read or write.
    fn settings_fields(&self) -> Vec<String>;

    /// Returns the field name used when callers do not name one explicitly.
    fn default_settings_field(&self) -> String {
        DEFAULT_SETTINGS_FIELD.to_string()
    }

    /// Reads the current raw serialized payload of a settings field.
    ///
    /// # Behavior
    /// `Ok(None)` means the field has never been written. The payload is not
    /// decoded here; corrupt payloads are handled defensively by the sink.
    fn read_field(&self, field: &str) -> SettingsResult<Option<String>>;

    /// Writes a new raw serialized payload for a settings field.
    fn write_field(&mut self, field: &str, payload: &str) -> SettingsResult<()>;

    /// Supplies the read-only default document for a field. Defaults overlay
    /// reads only; they are never persisted.
    fn default_document(&self, field: &str) -> Document;

    /// Supplies the validation rule set for a field. The default is an empty
    /// rule set, which every validator accepts.
    fn rules(&self, _field: &str) -> Document {
        Document::new()
    }

    /// Whether a successful field write should also trigger [SettingsHost::save].
    fn persist_on_write(&self) -> bool {
        true
    }

    /// Persists the entity itself. Called by the sink after a field write
    /// when [SettingsHost::persist_on_write] is set.
    fn save(&mut self) -> SettingsResult<()>;
}
