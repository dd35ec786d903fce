//! Custom rule - compiles the user supplied pattern.

use crate::config::{ConfigurationError, CustomPattern};
use regex::Regex;

/// Resolves the custom pattern input into the regex used by the `Custom` rule.
///
/// # Returns
/// - `Ok(Some(regex))` for a compiled pattern or a non-empty source string
/// - `Ok(None)` if the input is absent or an empty string
/// - `Err(InvalidPattern)` if the source string does not compile
pub fn parse_custom_pattern(
    pattern: Option<&CustomPattern>,
) -> Result<Option<Regex>, ConfigurationError> {
    match pattern {
        Some(CustomPattern::Compiled(regex)) => Ok(Some(regex.clone())),
        Some(CustomPattern::Source(source)) if !source.is_empty() => Regex::new(source)
            .map(Some)
            .map_err(|source_err| {
                #[cfg(feature = "tracing")]
                tracing::error!("Custom pattern {:?} does not compile: {}", source, source_err);
                ConfigurationError::InvalidPattern {
                    pattern: source.clone(),
                    source: source_err,
                }
            }),
        _ => Ok(None),
    }
}
