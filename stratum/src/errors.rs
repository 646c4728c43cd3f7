use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic, ReadExecutor};

/// Error kinds for settings store operations.
///
/// Each kind describes a category of failure so callers can react precisely,
/// e.g. treat a [ErrorKind::ValidationError] differently from a broken sink.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A settings field is not registered with the host, or the host
    /// declaration itself is inconsistent.
    ConfigurationError,
    /// The document violates the rules declared by the owning entity.
    /// Raised before persistence; the stored document is left unchanged.
    ValidationError,
    /// The operation is not valid in the current context (empty keys,
    /// malformed paths).
    InvalidOperation,
    /// Error encoding or decoding a document payload.
    EncodingError,
    /// The persistence sink failed to store a document snapshot.
    PersistenceError,
    /// Internal error (usually indicates a bug).
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ConfigurationError => write!(f, "Configuration error"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::PersistenceError => write!(f, "Persistence error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom error type for the settings store.
///
/// `SettingsError` carries the error message, its [ErrorKind] and an optional
/// cause, supporting error chaining and backtraces for debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use stratum::errors::{ErrorKind, SettingsError, SettingsResult};
///
/// fn example() -> SettingsResult<()> {
///     Err(SettingsError::new("field 'prefs' is not registered", ErrorKind::ConfigurationError))
/// }
/// ```
#[derive(Clone)]
pub struct SettingsError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<SettingsError>>,
    backtrace: Atomic<Backtrace>,
}

impl SettingsError {
    /// Creates a new `SettingsError` with the specified message and kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        SettingsError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `SettingsError` chained on top of an underlying cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: SettingsError) -> Self {
        SettingsError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&SettingsError> {
        self.cause.as_deref()
    }
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => self
                .backtrace
                .read_with(|trace| write!(f, "{}\n{:?}", self.message, trace)),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for settings store operations.
///
/// `SettingsResult<T>` is shorthand for `Result<T, SettingsError>`.
pub type SettingsResult<T> = Result<T, SettingsError>;

// From trait implementations for automatic error conversion
impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::new(
            &format!("JSON codec error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<String> for SettingsError {
    fn from(msg: String) -> Self {
        SettingsError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for SettingsError {
    fn from(msg: &str) -> Self {
        SettingsError::new(msg, ErrorKind::InternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_error_new_creates_error() {
        let error = SettingsError::new("An error occurred", ErrorKind::PersistenceError);
        assert_eq!(error.message(), "An error occurred");
        assert_eq!(error.kind(), &ErrorKind::PersistenceError);
        assert!(error.cause().is_none());
    }

    #[test]
    fn settings_error_new_with_cause_creates_error() {
        let cause = SettingsError::new("payload write failed", ErrorKind::PersistenceError);
        let error =
            SettingsError::new_with_cause("apply failed", ErrorKind::PersistenceError, cause);
        assert_eq!(error.message(), "apply failed");
        assert!(error.cause().is_some());
    }

    #[test]
    fn settings_error_display_formats_correctly() {
        let error = SettingsError::new("An error occurred", ErrorKind::ValidationError);
        assert_eq!(format!("{}", error), "An error occurred");
    }

    #[test]
    fn settings_error_debug_formats_with_cause() {
        let cause = SettingsError::new("disk unhappy", ErrorKind::PersistenceError);
        let error =
            SettingsError::new_with_cause("apply failed", ErrorKind::PersistenceError, cause);
        let formatted = format!("{:?}", error);
        assert!(formatted.contains("apply failed"));
        assert!(formatted.contains("Caused by:"));
    }

    #[test]
    fn settings_error_source_returns_cause() {
        let cause = SettingsError::new("root cause", ErrorKind::EncodingError);
        let error = SettingsError::new_with_cause("wrapper", ErrorKind::PersistenceError, cause);
        assert!(error.source().is_some());

        let error = SettingsError::new("no cause", ErrorKind::EncodingError);
        assert!(error.source().is_none());
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let settings_err: SettingsError = parse_err.into();
        assert_eq!(settings_err.kind(), &ErrorKind::EncodingError);
        assert!(settings_err.message().contains("JSON codec error"));
    }

    #[test]
    fn test_from_str_and_string() {
        let from_str: SettingsError = "string error".into();
        assert_eq!(from_str.kind(), &ErrorKind::InternalError);

        let from_string: SettingsError = String::from("owned error").into();
        assert_eq!(from_string.message(), "owned error");
    }

    #[test]
    fn test_error_kind_equality() {
        let error1 = SettingsError::new("Error 1", ErrorKind::ConfigurationError);
        let error2 = SettingsError::new("Error 2", ErrorKind::ConfigurationError);
        let error3 = SettingsError::new("Error 3", ErrorKind::ValidationError);

        assert_eq!(error1.kind(), error2.kind());
        assert_ne!(error1.kind(), error3.kind());
    }

    #[test]
    fn test_question_mark_operator_with_from() {
        fn decode_operation() -> SettingsResult<serde_json::Value> {
            let value: serde_json::Value = serde_json::from_str("broken")?;
            Ok(value)
        }

        let result = decode_operation();
        assert!(result.is_err());
        if let Err(err) = result {
            assert_eq!(err.kind(), &ErrorKind::EncodingError);
        }
    }
}
