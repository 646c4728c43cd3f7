use crate::common::{RULE_ARGUMENT_SEPARATOR, RULE_LIST_SEPARATOR, RULE_SEPARATOR};
use crate::document::{Document, Value};
use crate::errors::{ErrorKind, SettingsError, SettingsResult};

/// Validation capability consulted by the persistence sink before a document
/// snapshot is committed.
///
/// # Purpose
/// Decouples the settings store from any concrete rule engine. The validator
/// is injected where a store is acquired, so hosts can plug in their own
/// engine without touching the store itself.
///
/// # Behavior
/// `validate` receives the finalized document and the rule set supplied by
/// the owning entity for the field being written. Success is silent; failure
/// is a [ErrorKind::ValidationError] listing the violated paths and rules,
/// which aborts the write before anything is persisted.
pub trait Validator: Send + Sync {
    fn validate(&self, document: &Document, rules: &Document) -> SettingsResult<()>;
}

/// A validator that accepts every document. Used by hosts that declare no
/// rules of their own.
pub struct AcceptAll;

impl Validator for AcceptAll {
    fn validate(&self, _document: &Document, _rules: &Document) -> SettingsResult<()> {
        Ok(())
    }
}

/// A small built-in rule interpreter.
///
/// The rule set is a document mapping dot paths to `|`-separated clause
/// strings, e.g. `{"theme": "required|string|in:light,dark"}`. Supported
/// clauses:
///
/// * `required` - the path must be present and non-null
/// * `string`, `boolean`, `numeric`, `array` - type checks on present values
/// * `in:a,b,c` - the value must equal one of the listed options
///
/// Clauses other than `required` only constrain values that are present.
/// Unknown clauses are ignored, so a rule set may carry extras for an
/// external engine.
pub struct RuleValidator;

impl Validator for RuleValidator {
    fn validate(&self, document: &Document, rules: &Document) -> SettingsResult<()> {
        let mut violations: Vec<String> = Vec::new();

        for path in rules.fields() {
            let rule = match rules.get(&path)? {
                Value::String(rule) => rule,
                // non-string rule entries belong to some other engine
                _ => continue,
            };

            let present = document.contains_field(&path);
            let value = document.get(&path)?;

            for clause in rule.split(RULE_SEPARATOR) {
                if !check_clause(clause, present, &value) {
                    violations.push(format!("{} ({})", path, clause));
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            let message = format!("Settings validation failed: {}", violations.join(", "));
            log::error!("{}", message);
            Err(SettingsError::new(&message, ErrorKind::ValidationError))
        }
    }
}

fn check_clause(clause: &str, present: bool, value: &Value) -> bool {
    let (name, argument) = match clause.split_once(RULE_ARGUMENT_SEPARATOR) {
        Some((name, argument)) => (name, Some(argument)),
        None => (clause, None),
    };

    match name {
        "required" => present && !value.is_null(),
        // remaining clauses only constrain values that are present
        _ if !present => true,
        "string" => value.is_string(),
        "boolean" => value.is_bool(),
        "numeric" => value.is_number(),
        "array" => value.is_array(),
        "in" => match (argument, value) {
            (Some(options), Value::String(v)) => {
                options.split(RULE_LIST_SEPARATOR).any(|option| option == v)
            }
            (Some(options), other) => {
                // compare the textual form for non-string scalars
                let rendered = other.to_string();
                options
                    .split(RULE_LIST_SEPARATOR)
                    .any(|option| option == rendered)
            }
            (None, _) => false,
        },
        // unknown clauses are ignored
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_accept_all() {
        let validator = AcceptAll;
        let rules = doc! { theme: "required" };
        assert!(validator.validate(&Document::new(), &rules).is_ok());
    }

    #[test]
    fn test_rule_validator_passes_valid_document() {
        let validator = RuleValidator;
        let rules = doc! {
            theme: "required|string|in:light,dark",
            notify: { sms: "boolean" },
        };
        let document = doc! { theme: "dark", notify: { sms: true } };
        assert!(validator.validate(&document, &rules).is_ok());
    }

    #[test]
    fn test_rule_validator_rejects_out_of_range_value() {
        let validator = RuleValidator;
        let rules = doc! { theme: "in:light,dark" };
        let document = doc! { theme: "blue" };

        let error = validator.validate(&document, &rules).unwrap_err();
        assert_eq!(error.kind(), &ErrorKind::ValidationError);
        assert!(error.message().contains("theme"));
        assert!(error.message().contains("in:light,dark"));
    }

    #[test]
    fn test_rule_validator_required() {
        let validator = RuleValidator;
        let rules = doc! { theme: "required" };

        assert!(validator.validate(&Document::new(), &rules).is_err());
        assert!(validator
            .validate(&doc! { theme: (Value::Null) }, &rules)
            .is_err());
        assert!(validator.validate(&doc! { theme: "light" }, &rules).is_ok());
    }

    #[test]
    fn test_rule_validator_type_checks_only_present_values() {
        let validator = RuleValidator;
        let rules = doc! { retries: "numeric" };

        // absent values pass non-required clauses
        assert!(validator.validate(&Document::new(), &rules).is_ok());
        assert!(validator.validate(&doc! { retries: 3 }, &rules).is_ok());
        assert!(validator.validate(&doc! { retries: "three" }, &rules).is_err());
    }

    #[test]
    fn test_rule_validator_in_with_numbers() {
        let validator = RuleValidator;
        let rules = doc! { level: "in:1,2,3" };
        assert!(validator.validate(&doc! { level: 2 }, &rules).is_ok());
        assert!(validator.validate(&doc! { level: 9 }, &rules).is_err());
    }

    #[test]
    fn test_rule_validator_ignores_unknown_clauses() {
        let validator = RuleValidator;
        let rules = doc! { theme: "string|custom_engine_clause:whatever" };
        assert!(validator.validate(&doc! { theme: "light" }, &rules).is_ok());
    }

    #[test]
    fn test_rule_validator_reports_all_violations() {
        let validator = RuleValidator;
        let rules = doc! {
            theme: "in:light,dark",
            retries: "numeric",
        };
        let document = doc! { theme: "blue", retries: "three" };

        let error = validator.validate(&document, &rules).unwrap_err();
        assert!(error.message().contains("theme"));
        assert!(error.message().contains("retries"));
    }
}
