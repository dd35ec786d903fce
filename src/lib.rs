//! Rule-based password strength meter
//!
//! Scores a password against a configurable set of rules (length, character
//! classes, custom pattern), maps the score to a color band and derives the
//! validators a host form attaches to the password field.
//!
//! Every enabled rule weighs the same: a password satisfying `k` of `n`
//! rules scores `k * 100 / n`.
//!
//! # Features
//!
//! - `async` (default): Enables debounced evaluation over channels and
//!   broadcast subscriptions to strength changes
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! `Configuration::from_env` reads `PWD_STRENGTH_*` overrides on top of the
//! defaults (`min` 8, `max` 30, thresholds 21 and 81, every rule enabled).
//!
//! # Example
//!
//! ```rust
//! use pwd_strength_meter::{Change, Changes, ColorBand, Configuration, StrengthMeter};
//! use secrecy::SecretString;
//!
//! let mut meter = StrengthMeter::new(Configuration::default()).expect("valid configuration");
//!
//! let empty = SecretString::new("".to_string().into());
//! meter.notify(Changes::password(Change::first(empty))).expect("no pending changes");
//!
//! let previous = SecretString::new("".to_string().into());
//! let current = SecretString::new("password".to_string().into());
//! meter.notify(Changes::password(Change::new(previous, current))).expect("no pending changes");
//!
//! assert_eq!(meter.strength(), 40.0);
//! assert_eq!(meter.color(), ColorBand::Accent);
//! ```

// Internal modules
mod config;
mod evaluator;
mod events;
mod meter;
mod registry;
mod rules;
mod validators;

// Public API
pub use config::{Configuration, ConfigurationError, CustomPattern};
pub use evaluator::{evaluate, ColorBand, EvaluationResult, RuleFlags};
pub use events::StrengthEvents;
pub use meter::{Change, Changes, MeterAction, StrengthMeter};
pub use registry::{DegenerateConfigurationError, RuleRegistry};
pub use rules::RuleKind;
pub use validators::{
    compose, derive_validators, ConfirmationValidator, ValidationError, ValidationErrors,
    Validator,
};

#[cfg(feature = "async")]
pub use evaluator::{evaluate_tx, EVALUATION_DEBOUNCE_MS};

#[cfg(feature = "async")]
pub use events::EVENT_CHANNEL_CAPACITY;

/// Re-exported so hosts can pass compiled custom patterns.
pub use regex::Regex;
