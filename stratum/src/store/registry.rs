use std::sync::Arc;

use crate::common::{Atomic, ReadExecutor};
use crate::errors::{ErrorKind, SettingsError, SettingsResult};
use crate::store::{FieldSink, SettingsHost, SettingsStore};
use crate::validation::Validator;

/// Resolves settings field names to [SettingsStore] handles.
///
/// # Purpose
/// The explicit, typed accessor for a host entity's settings fields. The set
/// of registered field names and the default field are captured once at
/// construction; requesting any other name fails with a
/// [ErrorKind::ConfigurationError] before any read or write is attempted.
///
/// The validation capability is injected here and shared by every store the
/// registry hands out; there is no process-wide validation facade.
///
/// # Examples
///
/// ```ignore
/// let host: Atomic<dyn SettingsHost + Send + Sync> = atomic(my_record);
/// let registry = SettingsRegistry::new(host, Arc::new(RuleValidator));
///
/// let mut prefs = registry.store("preferences")?;
/// prefs.set("theme", "dark")?;
/// ```
pub struct SettingsRegistry {
    host: Atomic<dyn SettingsHost + Send + Sync>,
    validator: Arc<dyn Validator>,
    fields: Vec<String>,
    default_field: String,
}

impl SettingsRegistry {
    /// Creates a registry over a shared host, capturing its registered
    /// settings fields and default field name.
    pub fn new(
        host: Atomic<dyn SettingsHost + Send + Sync>,
        validator: Arc<dyn Validator>,
    ) -> Self {
        let (fields, default_field) =
            host.read_with(|host| (host.settings_fields(), host.default_settings_field()));
        SettingsRegistry {
            host,
            validator,
            fields,
            default_field,
        }
    }

    /// The registered settings field names.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Acquires the store for a named settings field.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::ConfigurationError] if the field is not
    /// registered; no host read or write is performed in that case.
    pub fn store(&self, field: &str) -> SettingsResult<SettingsStore> {
        if !self.fields.iter().any(|registered| registered == field) {
            log::error!("Settings field '{}' is not registered", field);
            return Err(SettingsError::new(
                &format!("Settings field '{}' is not registered", field),
                ErrorKind::ConfigurationError,
            ));
        }

        // defaults are snapshotted once per store acquisition
        let defaults = self.host.read_with(|host| host.default_document(field));
        let sink = FieldSink::new(self.host.clone(), self.validator.clone(), field);
        Ok(SettingsStore::new(field, defaults, Box::new(sink)))
    }

    /// Acquires the store for the host's default settings field.
    pub fn default_store(&self) -> SettingsResult<SettingsStore> {
        let field = self.default_field.clone();
        self.store(&field)
    }
}
