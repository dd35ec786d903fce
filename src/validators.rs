//! Form validators
//!
//! The meter does not validate fields itself. It derives a list of validators
//! from the registry and hands it to the host form, which applies them to the
//! password field.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::config::Configuration;
use crate::registry::RuleRegistry;
use crate::rules::RuleKind;

/// A single failure reported by a validator.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Required,
    MinLength { required: usize, actual: usize },
    MaxLength { required: usize, actual: usize },
    Pattern { required: String, actual: String },
    /// The password does not satisfy the rule; keyed by `RuleKind::key`.
    Rule(RuleKind),
    /// Failure from a host supplied validator, keyed by its own name.
    External(String),
}

impl ValidationError {
    /// Key under which the host form exposes this failure.
    pub fn key(&self) -> &str {
        match self {
            ValidationError::Required => "required",
            ValidationError::MinLength { .. } => "minlength",
            ValidationError::MaxLength { .. } => "maxlength",
            ValidationError::Pattern { .. } => "pattern",
            ValidationError::Rule(kind) => kind.key(),
            ValidationError::External(key) => key,
        }
    }
}

/// Every failure of a composed validator list, in validator order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|e| e.key() == key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub type ExternalCheck = Arc<dyn Fn(&str) -> Result<(), ValidationError> + Send + Sync>;

/// A check the host form applies to a field value.
#[derive(Clone)]
pub enum Validator {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
    Rule(RuleKind, Regex),
    External(ExternalCheck),
}

impl Validator {
    /// Wraps a host supplied check.
    pub fn external<F>(check: F) -> Self
    where
        F: Fn(&str) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        Validator::External(Arc::new(check))
    }

    /// Applies the validator to `value`.
    ///
    /// Length and pattern validators accept an empty value and leave it to
    /// `Required`; rule validators always test their pattern.
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        match self {
            Validator::Required => {
                if value.is_empty() {
                    return Err(ValidationError::Required);
                }
            }
            Validator::MinLength(required) => {
                let actual = value.chars().count();
                if !value.is_empty() && actual < *required {
                    return Err(ValidationError::MinLength { required: *required, actual });
                }
            }
            Validator::MaxLength(required) => {
                let actual = value.chars().count();
                if actual > *required {
                    return Err(ValidationError::MaxLength { required: *required, actual });
                }
            }
            Validator::Pattern(regex) => {
                if !value.is_empty() && !regex.is_match(value) {
                    return Err(ValidationError::Pattern {
                        required: regex.as_str().to_string(),
                        actual: value.to_string(),
                    });
                }
            }
            Validator::Rule(kind, regex) => {
                if !regex.is_match(value) {
                    return Err(ValidationError::Rule(*kind));
                }
            }
            Validator::External(check) => check(value)?,
        }
        Ok(())
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Required => write!(f, "Required"),
            Validator::MinLength(n) => write!(f, "MinLength({})", n),
            Validator::MaxLength(n) => write!(f, "MaxLength({})", n),
            Validator::Pattern(regex) => write!(f, "Pattern({:?})", regex.as_str()),
            Validator::Rule(kind, regex) => write!(f, "Rule({:?}, {:?})", kind, regex.as_str()),
            Validator::External(_) => write!(f, "External(..)"),
        }
    }
}

/// Builds the confirmation field's validator for the current password.
///
/// Implemented by the host; the meter only feeds it the password on every
/// rebuild.
pub trait ConfirmationValidator {
    fn confirm(&self, password: &str) -> Validator;
}

/// Derives the password field validators from the configuration and registry.
///
/// Order: `Required`, then min/max length if the length rule is enabled, then
/// a pattern validator for every other registry entry, then a rule validator
/// for every registry entry.
pub fn derive_validators(config: &Configuration, registry: &RuleRegistry) -> Vec<Validator> {
    let mut validators = vec![Validator::Required];

    if config.enable_min_length {
        validators.push(Validator::MinLength(config.min));
        validators.push(Validator::MaxLength(config.max));
    }

    validators.extend(
        registry
            .iter()
            .filter(|(kind, _)| *kind != RuleKind::MinLength)
            .map(|(_, regex)| Validator::Pattern(regex.clone())),
    );

    validators.extend(
        registry
            .iter()
            .map(|(kind, regex)| Validator::Rule(kind, regex.clone())),
    );

    validators
}

/// Runs every validator against `value` and collects all failures.
pub fn compose(validators: &[Validator], value: &str) -> Result<(), ValidationErrors> {
    let errors: Vec<_> = validators
        .iter()
        .filter_map(|v| v.validate(value).err())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
