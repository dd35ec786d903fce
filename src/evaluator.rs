//! Password strength evaluator - main scoring logic.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::config::Configuration;
use crate::registry::RuleRegistry;
use crate::rules::{min_length_satisfied, RuleKind};

/// Debounce applied by `evaluate_tx` before scoring.
#[cfg(feature = "async")]
pub const EVALUATION_DEBOUNCE_MS: u64 = 300;

/// Discrete severity shown next to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorBand {
    Warn,
    Accent,
    Primary,
}

impl ColorBand {
    /// `score < warn` is Warn, `score < accent` is Accent, anything else Primary.
    pub fn from_score(score: f64, warn_threshold: f64, accent_threshold: f64) -> Self {
        if score < warn_threshold {
            ColorBand::Warn
        } else if score < accent_threshold {
            ColorBand::Accent
        } else {
            ColorBand::Primary
        }
    }

    /// Palette name understood by the rendering surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorBand::Warn => "warn",
            ColorBand::Accent => "accent",
            ColorBand::Primary => "primary",
        }
    }
}

/// Which rules the last evaluated password satisfied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleFlags {
    pub min_length: bool,
    pub lower_case: bool,
    pub upper_case: bool,
    pub digit: bool,
    pub special_char: bool,
    pub custom: bool,
}

impl RuleFlags {
    pub fn get(&self, kind: RuleKind) -> bool {
        match kind {
            RuleKind::MinLength => self.min_length,
            RuleKind::LowerCase => self.lower_case,
            RuleKind::UpperCase => self.upper_case,
            RuleKind::Digit => self.digit,
            RuleKind::SpecialChar => self.special_char,
            RuleKind::Custom => self.custom,
        }
    }

    fn set(&mut self, kind: RuleKind, value: bool) {
        match kind {
            RuleKind::MinLength => self.min_length = value,
            RuleKind::LowerCase => self.lower_case = value,
            RuleKind::UpperCase => self.upper_case = value,
            RuleKind::Digit => self.digit = value,
            RuleKind::SpecialChar => self.special_char = value,
            RuleKind::Custom => self.custom = value,
        }
    }

    pub fn satisfied_count(&self) -> usize {
        RuleKind::ALL.iter().filter(|&&kind| self.get(kind)).count()
    }
}

/// Outcome of one evaluation. Never updated in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationResult {
    pub flags: RuleFlags,
    pub score: f64,
    pub color: ColorBand,
}

impl EvaluationResult {
    /// The state after the password is cleared: score 0, no rule satisfied.
    pub fn reset(config: &Configuration) -> Self {
        Self {
            flags: RuleFlags::default(),
            score: 0.0,
            color: ColorBand::from_score(0.0, config.warn_threshold, config.accent_threshold),
        }
    }
}

fn rule_enabled(kind: RuleKind, config: &Configuration) -> bool {
    match kind {
        RuleKind::MinLength => config.enable_min_length,
        RuleKind::LowerCase => config.enable_lower_case,
        RuleKind::UpperCase => config.enable_upper_case,
        RuleKind::Digit => config.enable_digit,
        RuleKind::SpecialChar => config.enable_special_char,
        RuleKind::Custom => config.has_custom_pattern(),
    }
}

fn pattern_satisfied(password: &str, pattern: Option<&Regex>) -> bool {
    pattern.is_some_and(|regex| regex.is_match(password))
}

/// Scores `password` against the rules in `registry`.
///
/// Each satisfied rule contributes `100 / registry.len()`. Disabled rules are
/// not evaluated and count as unsatisfied. The length rule only checks the
/// lower bound here; the upper bound is enforced by the validators.
///
/// An empty registry yields a score of 0 and `ColorBand::Warn`.
pub fn evaluate(
    password: &SecretString,
    registry: &RuleRegistry,
    config: &Configuration,
) -> EvaluationResult {
    let pwd = password.expose_secret();

    let unit = match registry.unit() {
        Ok(unit) => unit,
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("Password not scored: {}", _e);
            return EvaluationResult {
                flags: RuleFlags::default(),
                score: 0.0,
                color: ColorBand::Warn,
            };
        }
    };

    let mut flags = RuleFlags::default();
    for kind in RuleKind::ALL {
        if !rule_enabled(kind, config) {
            continue;
        }
        let satisfied = match kind {
            RuleKind::MinLength => min_length_satisfied(pwd, config.min),
            _ => pattern_satisfied(pwd, registry.get(kind)),
        };
        flags.set(kind, satisfied);
    }

    let score = flags.satisfied_count() as f64 * unit;

    EvaluationResult {
        flags,
        score,
        color: ColorBand::from_score(score, config.warn_threshold, config.accent_threshold),
    }
}

/// Async version that debounces and sends the evaluation result via channel.
///
/// The token is only checked during the debounce; once scoring starts it runs
/// to completion.
#[cfg(feature = "async")]
pub async fn evaluate_tx(
    password: &SecretString,
    registry: &RuleRegistry,
    config: &Configuration,
    token: CancellationToken,
    tx: mpsc::Sender<EvaluationResult>,
) {
    use std::time::Duration;

    #[cfg(feature = "tracing")]
    tracing::info!("evaluation is about to start...");

    tokio::select! {
        _ = token.cancelled() => {
            #[cfg(feature = "tracing")]
            tracing::debug!("evaluation superseded before it started");
            return;
        }
        _ = tokio::time::sleep(Duration::from_millis(EVALUATION_DEBOUNCE_MS)) => {}
    }

    let evaluation = evaluate(password, registry, config);

    if let Err(_e) = tx.send(evaluation).await {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send password evaluation result: {}", _e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    fn score_with(config: &Configuration, pwd: &str) -> EvaluationResult {
        let registry = RuleRegistry::build(config).unwrap();
        evaluate(&secret(pwd), &registry, config)
    }

    fn assert_score(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "Expected score {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_evaluate_all_rules_satisfied() {
        let result = score_with(&Configuration::default(), "Passw0rd!");
        assert_score(result.score, 100.0);
        assert_eq!(result.color, ColorBand::Primary);
        assert_eq!(result.flags.satisfied_count(), 5);
        assert!(!result.flags.custom);
    }

    #[test]
    fn test_evaluate_lower_case_only() {
        let result = score_with(&Configuration::default(), "password");
        assert_score(result.score, 40.0);
        assert_eq!(result.color, ColorBand::Accent);
        assert!(result.flags.min_length);
        assert!(result.flags.lower_case);
        assert!(!result.flags.upper_case);
        assert!(!result.flags.digit);
        assert!(!result.flags.special_char);
    }

    #[test]
    fn test_evaluate_two_rules_none_satisfied() {
        let config = Configuration::default()
            .without_rules()
            .with_min_length(true)
            .with_digit(true);
        let result = score_with(&config, "abc");
        assert_score(result.score, 0.0);
        assert_eq!(result.color, ColorBand::Warn);
        assert_eq!(result.flags, RuleFlags::default());
    }

    #[test]
    fn test_evaluate_custom_pattern() {
        let config = Configuration::default().with_custom_pattern("xyz");
        let result = score_with(&config, "Passw0rd!xyz");
        assert_eq!(result.score, 100.0);
        assert!(result.flags.custom);

        let result = score_with(&config, "Passw0rd!");
        assert_score(result.score, 500.0 / 6.0);
        assert!(!result.flags.custom);
    }

    #[test]
    fn test_evaluate_no_rules_enabled() {
        let config = Configuration::default().without_rules();
        let result = score_with(&config, "Passw0rd!");
        assert_eq!(result.score, 0.0);
        assert!(result.score.is_finite());
        assert_eq!(result.color, ColorBand::Warn);
    }

    #[test]
    fn test_evaluate_no_rules_enabled_low_thresholds() {
        let config = Configuration::default().without_rules().with_thresholds(0.0, 0.0);
        let result = score_with(&config, "anything");
        assert_eq!(result.color, ColorBand::Warn);
    }

    #[test]
    fn test_evaluate_equal_weighting() {
        let base = Configuration::default().without_rules();
        let configs = vec![
            base.clone().with_lower_case(true),
            base.clone().with_lower_case(true).with_digit(true),
            base.clone().with_lower_case(true).with_digit(true).with_upper_case(true),
            Configuration::default(),
            Configuration::default().with_custom_pattern("q"),
        ];

        for config in configs {
            let registry = RuleRegistry::build(&config).unwrap();
            let unit = registry.unit().unwrap();
            let result = evaluate(&secret("lower"), &registry, &config);
            assert_eq!(result.score, result.flags.satisfied_count() as f64 * unit);
        }
    }

    #[test]
    fn test_evaluate_five_of_six_rules() {
        let config = Configuration::default().with_custom_pattern("q");
        let registry = RuleRegistry::build(&config).unwrap();
        let unit = registry.unit().unwrap();
        assert_eq!(unit, 100.0 / 6.0);

        let result = evaluate(&secret("Passw0rd!"), &registry, &config);
        assert_eq!(result.flags.satisfied_count(), 5);
        assert!(!result.flags.custom);
        assert_eq!(result.score, 5.0 * unit);
        assert_eq!(result.color, ColorBand::Primary);
    }

    #[test]
    fn test_evaluate_full_house_is_exactly_100() {
        let all = Configuration::default().with_custom_pattern("xyz");
        let configs = vec![
            all.clone().without_rules().with_digit(true),
            all.clone().without_rules().with_digit(true).with_lower_case(true),
            all.clone().with_upper_case(false).with_special_char(false).with_custom_pattern(""),
            all.clone().with_custom_pattern(""),
            all.clone().with_digit(false),
            all,
        ];

        for config in configs {
            let result = score_with(&config, "Passw0rd!xyz");
            assert_eq!(result.score, 100.0, "{:?}", config);
        }
    }

    #[test]
    fn test_evaluate_adding_rules() {
        let base = Configuration::default()
            .without_rules()
            .with_lower_case(true)
            .with_digit(true);
        let before = score_with(&base, "abcdefgh");
        assert_score(before.score, 50.0);

        // one more satisfied rule: unit shrinks but score grows
        let satisfied = score_with(&base.clone().with_min_length(true), "abcdefgh");
        assert_score(satisfied.score, 200.0 / 3.0);
        assert!(satisfied.score >= before.score);

        // one more unsatisfied rule: score drops
        let unsatisfied = score_with(&base.with_upper_case(true), "abcdefgh");
        assert_score(unsatisfied.score, 100.0 / 3.0);
        assert!(unsatisfied.score < before.score);
    }

    #[test]
    fn test_evaluate_min_length_boundary() {
        let config = Configuration::default();
        let short = score_with(&config, "Passw0!");
        assert!(!short.flags.min_length);

        let long = format!("Passw0rd!{}", "x".repeat(100));
        let result = score_with(&config, &long);
        assert!(result.flags.min_length);
        assert_score(result.score, 100.0);
    }

    #[test]
    fn test_evaluate_disabled_rule_not_evaluated() {
        let config = Configuration::default().with_upper_case(false);
        let result = score_with(&config, "Passw0rd!");
        assert!(!result.flags.upper_case);
        assert_score(result.score, 100.0);
    }

    #[test]
    fn test_color_band_boundaries() {
        assert_eq!(ColorBand::from_score(0.0, 21.0, 81.0), ColorBand::Warn);
        assert_eq!(ColorBand::from_score(20.0, 21.0, 81.0), ColorBand::Warn);
        assert_eq!(ColorBand::from_score(21.0, 21.0, 81.0), ColorBand::Accent);
        assert_eq!(ColorBand::from_score(80.0, 21.0, 81.0), ColorBand::Accent);
        assert_eq!(ColorBand::from_score(81.0, 21.0, 81.0), ColorBand::Primary);
        assert_eq!(ColorBand::from_score(100.0, 21.0, 81.0), ColorBand::Primary);
    }

    #[test]
    fn test_color_band_threshold_belongs_to_upper_band() {
        let config = Configuration::default().with_thresholds(40.0, 80.0);
        let result = score_with(&config, "password");
        assert_score(result.score, 40.0);
        assert_eq!(result.color, ColorBand::Accent);

        let result = score_with(&config, "Password1");
        assert_score(result.score, 80.0);
        assert_eq!(result.color, ColorBand::Primary);
    }

    #[test]
    fn test_reset_result() {
        let result = EvaluationResult::reset(&Configuration::default());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.flags, RuleFlags::default());
        assert_eq!(result.color, ColorBand::Warn);
    }

    #[test]
    fn test_evaluate_score_boundaries() {
        let config = Configuration::default().with_custom_pattern("[0-9]{3}");
        let registry = RuleRegistry::build(&config).unwrap();
        for pwd in ["", "a", "password", "MyPass123!", "VeryStrongPassword123!@#"] {
            let result = evaluate(&secret(pwd), &registry, &config);
            assert!(
                (0.0..=100.0).contains(&result.score),
                "Score {} out of bounds for password '{}'",
                result.score,
                pwd
            );
        }
    }
}
