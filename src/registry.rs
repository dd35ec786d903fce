//! Rule registry
//!
//! Maps every enabled rule kind to the pattern it is matched with. The
//! registry is rebuilt from scratch whenever the configuration changes.

use regex::Regex;
use thiserror::Error;

use crate::config::{ConfigurationError, Configuration};
use crate::rules::{
    digit_pattern, length_pattern, lower_case_pattern, parse_custom_pattern,
    special_char_pattern, upper_case_pattern, RuleKind,
};

/// Returned when no rule is enabled and the strength unit is undefined.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("No rules enabled: strength unit is undefined")]
pub struct DegenerateConfigurationError;

/// Ordered mapping from enabled rule kind to its pattern.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    entries: Vec<(RuleKind, Regex)>,
}

impl RuleRegistry {
    /// Builds the registry for `config`.
    ///
    /// Entries follow the fixed order MinLength, LowerCase, UpperCase, Digit,
    /// SpecialChar, Custom. `Custom` is omitted when no custom pattern is set.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The custom pattern does not compile
    /// - `min` is greater than `max`
    pub fn build(config: &Configuration) -> Result<Self, ConfigurationError> {
        let mut entries = Vec::with_capacity(RuleKind::ALL.len());

        if config.enable_min_length {
            entries.push((RuleKind::MinLength, length_pattern(config.min, config.max)?));
        }
        if config.enable_lower_case {
            entries.push((RuleKind::LowerCase, lower_case_pattern()));
        }
        if config.enable_upper_case {
            entries.push((RuleKind::UpperCase, upper_case_pattern()));
        }
        if config.enable_digit {
            entries.push((RuleKind::Digit, digit_pattern()));
        }
        if config.enable_special_char {
            entries.push((RuleKind::SpecialChar, special_char_pattern()));
        }
        if let Some(custom) = parse_custom_pattern(config.custom_pattern.as_ref())? {
            entries.push((RuleKind::Custom, custom));
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Rule registry built: {} rules", entries.len());

        Ok(Self { entries })
    }

    pub fn get(&self, kind: RuleKind) -> Option<&Regex> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, regex)| regex)
    }

    pub fn contains(&self, kind: RuleKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleKind, &Regex)> {
        self.entries.iter().map(|(kind, regex)| (*kind, regex))
    }

    pub fn kinds(&self) -> Vec<RuleKind> {
        self.entries.iter().map(|(kind, _)| *kind).collect()
    }

    /// Score contributed by each satisfied rule: `100 / len`.
    pub fn unit(&self) -> Result<f64, DegenerateConfigurationError> {
        if self.entries.is_empty() {
            return Err(DegenerateConfigurationError);
        }
        Ok(100.0 / self.entries.len() as f64)
    }
}
