//! Length rule - minimum length predicate and the bounded length pattern.

use crate::config::ConfigurationError;
use regex::Regex;

/// Builds the `^.{min,max}$` pattern used by the length rule validator.
///
/// # Errors
/// - `InvalidLengthBounds` if `min > max`
/// - `InvalidPattern` if the repetition exceeds the regex size limit
pub fn length_pattern(min: usize, max: usize) -> Result<Regex, ConfigurationError> {
    if min > max {
        #[cfg(feature = "tracing")]
        tracing::error!("Length rule rejected: min {} > max {}", min, max);
        return Err(ConfigurationError::InvalidLengthBounds { min, max });
    }
    let pattern = format!("^.{{{},{}}}$", min, max);
    Regex::new(&pattern).map_err(|source| ConfigurationError::InvalidPattern { pattern, source })
}

/// Checks only the lower bound; the upper bound is left to the validators.
pub fn min_length_satisfied(password: &str, min: usize) -> bool {
    password.chars().count() >= min
}
