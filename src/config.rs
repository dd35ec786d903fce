//! Meter configuration
//!
//! Holds the rule toggles, length bounds, custom pattern and color thresholds.

use regex::Regex;
use std::env;
use thiserror::Error;

pub const DEFAULT_MIN: usize = 8;
pub const DEFAULT_MAX: usize = 30;
pub const DEFAULT_WARN_THRESHOLD: f64 = 21.0;
pub const DEFAULT_ACCENT_THRESHOLD: f64 = 81.0;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid custom pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Invalid length bounds: min {min} is greater than max {max}")]
    InvalidLengthBounds { min: usize, max: usize },
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnvValue { var: &'static str, value: String },
}

/// User supplied pattern for the `Custom` rule.
///
/// A compiled pattern is used verbatim, a source string is compiled when the
/// registry is built.
#[derive(Debug, Clone)]
pub enum CustomPattern {
    Compiled(Regex),
    Source(String),
}

impl CustomPattern {
    /// Whether this input yields a `Custom` rule at all.
    ///
    /// An empty source string counts as absent; a compiled pattern never does.
    pub fn is_present(&self) -> bool {
        match self {
            CustomPattern::Compiled(_) => true,
            CustomPattern::Source(source) => !source.is_empty(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CustomPattern::Compiled(regex) => regex.as_str(),
            CustomPattern::Source(source) => source,
        }
    }
}

impl From<Regex> for CustomPattern {
    fn from(regex: Regex) -> Self {
        CustomPattern::Compiled(regex)
    }
}

impl From<String> for CustomPattern {
    fn from(source: String) -> Self {
        CustomPattern::Source(source)
    }
}

impl From<&str> for CustomPattern {
    fn from(source: &str) -> Self {
        CustomPattern::Source(source.to_string())
    }
}

/// Snapshot of everything the registry and the scorer depend on.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub enable_min_length: bool,
    pub enable_lower_case: bool,
    pub enable_upper_case: bool,
    pub enable_digit: bool,
    pub enable_special_char: bool,
    pub min: usize,
    pub max: usize,
    pub custom_pattern: Option<CustomPattern>,
    pub warn_threshold: f64,
    pub accent_threshold: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            enable_min_length: true,
            enable_lower_case: true,
            enable_upper_case: true,
            enable_digit: true,
            enable_special_char: true,
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            custom_pattern: None,
            warn_threshold: DEFAULT_WARN_THRESHOLD,
            accent_threshold: DEFAULT_ACCENT_THRESHOLD,
        }
    }
}

impl Configuration {
    pub fn with_min_length(mut self, enabled: bool) -> Self {
        self.enable_min_length = enabled;
        self
    }

    pub fn with_lower_case(mut self, enabled: bool) -> Self {
        self.enable_lower_case = enabled;
        self
    }

    pub fn with_upper_case(mut self, enabled: bool) -> Self {
        self.enable_upper_case = enabled;
        self
    }

    pub fn with_digit(mut self, enabled: bool) -> Self {
        self.enable_digit = enabled;
        self
    }

    pub fn with_special_char(mut self, enabled: bool) -> Self {
        self.enable_special_char = enabled;
        self
    }

    pub fn with_bounds(mut self, min: usize, max: usize) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_custom_pattern(mut self, pattern: impl Into<CustomPattern>) -> Self {
        self.custom_pattern = Some(pattern.into());
        self
    }

    pub fn with_thresholds(mut self, warn: f64, accent: f64) -> Self {
        self.warn_threshold = warn;
        self.accent_threshold = accent;
        self
    }

    /// Disables every rule toggle and drops the custom pattern.
    pub fn without_rules(self) -> Self {
        Self {
            enable_min_length: false,
            enable_lower_case: false,
            enable_upper_case: false,
            enable_digit: false,
            enable_special_char: false,
            custom_pattern: None,
            ..self
        }
    }

    /// Whether a `Custom` rule will be part of the registry.
    pub fn has_custom_pattern(&self) -> bool {
        self.custom_pattern
            .as_ref()
            .is_some_and(CustomPattern::is_present)
    }

    /// Builds a configuration from the defaults overlaid with environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PWD_STRENGTH_MIN`, `PWD_STRENGTH_MAX`: length bounds
    /// - `PWD_STRENGTH_WARN_THRESHOLD`, `PWD_STRENGTH_ACCENT_THRESHOLD`: color thresholds
    /// - `PWD_STRENGTH_CUSTOM_PATTERN`: custom rule pattern source
    /// - `PWD_STRENGTH_ENABLE_MIN_LENGTH`, `PWD_STRENGTH_ENABLE_LOWER_CASE`,
    ///   `PWD_STRENGTH_ENABLE_UPPER_CASE`, `PWD_STRENGTH_ENABLE_DIGIT`,
    ///   `PWD_STRENGTH_ENABLE_SPECIAL_CHAR`: `true`/`false`/`1`/`0`
    ///
    /// # Errors
    ///
    /// Returns `InvalidEnvValue` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let mut config = Self::default();

        if let Some(v) = env_flag("PWD_STRENGTH_ENABLE_MIN_LENGTH")? {
            config.enable_min_length = v;
        }
        if let Some(v) = env_flag("PWD_STRENGTH_ENABLE_LOWER_CASE")? {
            config.enable_lower_case = v;
        }
        if let Some(v) = env_flag("PWD_STRENGTH_ENABLE_UPPER_CASE")? {
            config.enable_upper_case = v;
        }
        if let Some(v) = env_flag("PWD_STRENGTH_ENABLE_DIGIT")? {
            config.enable_digit = v;
        }
        if let Some(v) = env_flag("PWD_STRENGTH_ENABLE_SPECIAL_CHAR")? {
            config.enable_special_char = v;
        }
        if let Some(v) = env_parse("PWD_STRENGTH_MIN")? {
            config.min = v;
        }
        if let Some(v) = env_parse("PWD_STRENGTH_MAX")? {
            config.max = v;
        }
        if let Some(v) = env_parse("PWD_STRENGTH_WARN_THRESHOLD")? {
            config.warn_threshold = v;
        }
        if let Some(v) = env_parse("PWD_STRENGTH_ACCENT_THRESHOLD")? {
            config.accent_threshold = v;
        }
        if let Ok(source) = env::var("PWD_STRENGTH_CUSTOM_PATTERN") {
            config.custom_pattern = Some(CustomPattern::Source(source));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Configuration loaded from environment: {:?}", config);

        Ok(config)
    }
}

fn env_parse<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigurationError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigurationError::InvalidEnvValue { var, value }),
        Err(_) => Ok(None),
    }
}

fn env_flag(var: &'static str) -> Result<Option<bool>, ConfigurationError> {
    match env::var(var) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(ConfigurationError::InvalidEnvValue { var, value }),
        },
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 10] = [
        "PWD_STRENGTH_MIN",
        "PWD_STRENGTH_MAX",
        "PWD_STRENGTH_WARN_THRESHOLD",
        "PWD_STRENGTH_ACCENT_THRESHOLD",
        "PWD_STRENGTH_CUSTOM_PATTERN",
        "PWD_STRENGTH_ENABLE_MIN_LENGTH",
        "PWD_STRENGTH_ENABLE_LOWER_CASE",
        "PWD_STRENGTH_ENABLE_UPPER_CASE",
        "PWD_STRENGTH_ENABLE_DIGIT",
        "PWD_STRENGTH_ENABLE_SPECIAL_CHAR",
    ];

    /// Helper to safely set env var in tests
    fn set_env(key: &str, value: &str) {
        // SAFETY: This is only for testing purposes in single-threaded test context
        unsafe { std::env::set_var(key, value); }
    }

    fn clear_env() {
        for var in VARS {
            // SAFETY: This is only for testing purposes in single-threaded test context
            unsafe { std::env::remove_var(var); }
        }
    }

    #[test]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.min, 8);
        assert_eq!(config.max, 30);
        assert_eq!(config.warn_threshold, 21.0);
        assert_eq!(config.accent_threshold, 81.0);
        assert!(config.enable_min_length);
        assert!(config.enable_lower_case);
        assert!(config.enable_upper_case);
        assert!(config.enable_digit);
        assert!(config.enable_special_char);
        assert!(!config.has_custom_pattern());
    }

    #[test]
    fn test_empty_custom_source_is_absent() {
        let config = Configuration::default().with_custom_pattern("");
        assert!(!config.has_custom_pattern());

        let config = Configuration::default().with_custom_pattern(Regex::new("").unwrap());
        assert!(config.has_custom_pattern());
    }

    #[test]
    fn test_without_rules() {
        let config = Configuration::default()
            .with_custom_pattern("xyz")
            .without_rules();
        assert!(!config.enable_min_length);
        assert!(!config.enable_special_char);
        assert!(!config.has_custom_pattern());
        assert_eq!(config.min, 8);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Configuration::from_env().unwrap();
        assert_eq!(config.min, DEFAULT_MIN);
        assert_eq!(config.max, DEFAULT_MAX);
        assert!(config.custom_pattern.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        set_env("PWD_STRENGTH_MIN", "12");
        set_env("PWD_STRENGTH_MAX", "64");
        set_env("PWD_STRENGTH_WARN_THRESHOLD", "30.5");
        set_env("PWD_STRENGTH_ENABLE_DIGIT", "false");
        set_env("PWD_STRENGTH_ENABLE_SPECIAL_CHAR", "0");
        set_env("PWD_STRENGTH_CUSTOM_PATTERN", "xyz");

        let config = Configuration::from_env().unwrap();
        assert_eq!(config.min, 12);
        assert_eq!(config.max, 64);
        assert_eq!(config.warn_threshold, 30.5);
        assert!(!config.enable_digit);
        assert!(!config.enable_special_char);
        assert!(config.enable_upper_case);
        assert_eq!(config.custom_pattern.as_ref().map(|p| p.as_str()), Some("xyz"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_value() {
        clear_env();
        set_env("PWD_STRENGTH_MIN", "eight");

        match Configuration::from_env() {
            Err(ConfigurationError::InvalidEnvValue { var, value }) => {
                assert_eq!(var, "PWD_STRENGTH_MIN");
                assert_eq!(value, "eight");
            }
            other => panic!("Expected InvalidEnvValue error, got {:?}", other),
        }

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_flag() {
        clear_env();
        set_env("PWD_STRENGTH_ENABLE_LOWER_CASE", "maybe");

        let result = Configuration::from_env();
        assert!(matches!(result, Err(ConfigurationError::InvalidEnvValue { .. })));

        clear_env();
    }
}
