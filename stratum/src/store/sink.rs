use std::sync::Arc;

use crate::common::{Atomic, ReadExecutor, WriteExecutor};
use crate::document::Document;
use crate::errors::SettingsResult;
use crate::store::SettingsHost;
use crate::validation::Validator;

/// Persistence sink consumed by a settings store.
///
/// # Purpose
/// Separates the store's document algebra from how snapshots are loaded and
/// committed. The store never talks to the host entity directly; every read
/// of the stored document and every commit of a working copy goes through
/// this contract.
pub trait SettingsSink {
    /// Loads the current stored document.
    ///
    /// # Behavior
    /// Absent, corrupt, or non-object payloads all degrade to an empty
    /// document; decode failures are never surfaced as errors.
    fn load(&self) -> SettingsResult<Document>;

    /// Validates and persists a finalized document snapshot.
    ///
    /// # Behavior
    /// Validation failure aborts the write before anything is persisted. On
    /// success the stored document is replaced by exactly what was passed in;
    /// defaults are never merged in before storing.
    fn apply(&mut self, document: &Document) -> SettingsResult<()>;
}

/// The host-backed [SettingsSink]: one sink per settings field, sharing the
/// host entity with every other sink acquired from the same registry.
pub struct FieldSink {
    host: Atomic<dyn SettingsHost + Send + Sync>,
    validator: Arc<dyn Validator>,
    field: String,
}

impl FieldSink {
    pub fn new(
        host: Atomic<dyn SettingsHost + Send + Sync>,
        validator: Arc<dyn Validator>,
        field: &str,
    ) -> Self {
        FieldSink {
            host,
            validator,
            field: field.to_string(),
        }
    }
}

impl SettingsSink for FieldSink {
    fn load(&self) -> SettingsResult<Document> {
        let payload = self.host.read_with(|host| host.read_field(&self.field))?;
        let payload = match payload {
            Some(payload) => payload,
            None => return Ok(Document::new()),
        };

        match Document::from_json(&payload) {
            Ok(document) => Ok(document),
            Err(error) => {
                // defensive decode: an unreadable payload reads as empty
                log::warn!(
                    "Discarding unreadable settings payload for field '{}': {}",
                    self.field,
                    error
                );
                Ok(Document::new())
            }
        }
    }

    fn apply(&mut self, document: &Document) -> SettingsResult<()> {
        let rules = self.host.read_with(|host| host.rules(&self.field));
        self.validator.validate(document, &rules)?;

        let payload = document.to_json()?;
        self.host.write_with(|host| {
            host.write_field(&self.field, &payload)?;
            if host.persist_on_write() {
                host.save()?;
            }
            Ok(())
        })
    }
}
