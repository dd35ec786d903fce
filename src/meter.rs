//! Strength meter
//!
//! Owns the configuration, the rule registry and the derived validators, and
//! reacts to the host's change notifications. The host calls
//! `StrengthMeter::new` once on setup and `notify` once per input change.

use secrecy::{ExposeSecret, SecretString};

use crate::config::{ConfigurationError, Configuration};
use crate::evaluator::{evaluate, ColorBand, EvaluationResult, RuleFlags};
use crate::events::StrengthEvents;
use crate::registry::RuleRegistry;
use crate::validators::{derive_validators, ConfirmationValidator, Validator};

/// One input change as reported by the host.
#[derive(Debug, Clone)]
pub struct Change<T> {
    pub previous: Option<T>,
    pub current: T,
    pub first_change: bool,
}

impl<T> Change<T> {
    /// The very first value the host binds to the input.
    pub fn first(current: T) -> Self {
        Self {
            previous: None,
            current,
            first_change: true,
        }
    }

    pub fn new(previous: T, current: T) -> Self {
        Self {
            previous: Some(previous),
            current,
            first_change: false,
        }
    }
}

/// Inputs that changed since the last notification.
#[derive(Debug, Default)]
pub struct Changes {
    pub password: Option<Change<SecretString>>,
    pub external_error: Option<Change<bool>>,
}

impl Changes {
    pub fn password(change: Change<SecretString>) -> Self {
        Self {
            password: Some(change),
            external_error: None,
        }
    }

    pub fn external_error(change: Change<bool>) -> Self {
        Self {
            password: None,
            external_error: Some(change),
        }
    }
}

/// What `notify` did with a change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterAction {
    /// First binding of an input; nothing was evaluated.
    Skipped,
    /// External error raised; color forced to warn, score untouched.
    ExternalError,
    Evaluated,
    Reset,
    /// The configuration does not build; the meter is unusable.
    Invalid,
}

type ChangeCallback = Box<dyn FnMut(f64) + Send>;
type Confirmation = Box<dyn ConfirmationValidator + Send>;

pub struct StrengthMeter {
    config: Configuration,
    config_dirty: bool,
    registry: Option<RuleRegistry>,
    validators: Vec<Validator>,
    confirmation: Option<Confirmation>,
    confirmation_validators: Vec<Validator>,
    password: SecretString,
    strength: f64,
    flags: RuleFlags,
    color_override: Option<ColorBand>,
    on_change: ChangeCallback,
    events: StrengthEvents,
}

impl StrengthMeter {
    /// Sets up the meter: builds the registry and the validators.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration does not build a registry.
    pub fn new(config: Configuration) -> Result<Self, ConfigurationError> {
        let mut meter = Self {
            config,
            config_dirty: true,
            registry: None,
            validators: Vec::new(),
            confirmation: None,
            confirmation_validators: Vec::new(),
            password: SecretString::new(String::new().into()),
            strength: 0.0,
            flags: RuleFlags::default(),
            color_override: None,
            on_change: Box::new(|_| {}),
            events: StrengthEvents::new(),
        };
        meter.rebuild_if_config_changed()?;
        Ok(meter)
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Updates the configuration in place. The registry is rebuilt lazily, by
    /// `rebuild_if_config_changed` or the next `notify`.
    pub fn configure<F>(&mut self, update: F)
    where
        F: FnOnce(&mut Configuration),
    {
        update(&mut self.config);
        self.config_dirty = true;
    }

    /// Replaces the configuration and rebuilds right away.
    pub fn set_configuration(&mut self, config: Configuration) -> Result<(), ConfigurationError> {
        self.config = config;
        self.config_dirty = true;
        self.rebuild_if_config_changed().map(|_| ())
    }

    /// Rebuilds registry and validators if the configuration changed.
    ///
    /// Returns whether a rebuild happened. On error the meter drops its
    /// registry and stays invalid until a configuration builds again.
    pub fn rebuild_if_config_changed(&mut self) -> Result<bool, ConfigurationError> {
        if !self.config_dirty {
            return Ok(false);
        }
        self.config_dirty = false;

        match RuleRegistry::build(&self.config) {
            Ok(registry) => {
                self.validators = derive_validators(&self.config, &registry);
                self.registry = Some(registry);
                self.refresh_confirmation();
                Ok(true)
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Strength meter configuration rejected: {}", e);
                self.registry = None;
                self.validators.clear();
                self.reset();
                Err(e)
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.registry.is_some()
    }

    pub fn registry(&self) -> Option<&RuleRegistry> {
        self.registry.as_ref()
    }

    /// Validators for the password field, in application order.
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Validators for the confirmation field: required plus the confirmation check.
    pub fn confirmation_validators(&self) -> &[Validator] {
        &self.confirmation_validators
    }

    pub fn set_confirmation_validator<C>(&mut self, confirmation: C)
    where
        C: ConfirmationValidator + Send + 'static,
    {
        self.confirmation = Some(Box::new(confirmation));
        self.refresh_confirmation();
    }

    fn refresh_confirmation(&mut self) {
        let mut validators = vec![Validator::Required];
        if let Some(confirmation) = &self.confirmation {
            validators.push(confirmation.confirm(self.password.expose_secret()));
        }
        self.confirmation_validators = validators;
    }

    /// Registers the form-value callback. Replaces any previous one.
    pub fn register_on_change<F>(&mut self, callback: F)
    where
        F: FnMut(f64) + Send + 'static,
    {
        self.on_change = Box::new(callback);
    }

    pub fn events(&mut self) -> &mut StrengthEvents {
        &mut self.events
    }

    /// Host pushes a score into the meter. Zero is ignored.
    pub fn write_value(&mut self, score: f64) {
        if score != 0.0 && !score.is_nan() {
            self.strength = score.clamp(0.0, 100.0);
        }
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn flags(&self) -> RuleFlags {
        self.flags
    }

    pub fn color(&self) -> ColorBand {
        if !self.is_valid() {
            return ColorBand::Warn;
        }
        self.color_override.unwrap_or_else(|| {
            ColorBand::from_score(
                self.strength,
                self.config.warn_threshold,
                self.config.accent_threshold,
            )
        })
    }

    /// Clears score and flags. Registry and configuration are untouched.
    pub fn reset(&mut self) {
        let cleared = EvaluationResult::reset(&self.config);
        self.strength = cleared.score;
        self.flags = cleared.flags;
        self.color_override = None;
    }

    /// Handles one change notification from the host.
    ///
    /// # Errors
    ///
    /// Returns error if a pending configuration change does not build. That
    /// call reports the error once; later calls return
    /// `Ok(MeterAction::Invalid)` until a configuration builds again, so hosts
    /// must treat both as an unusable meter.
    pub fn notify(&mut self, changes: Changes) -> Result<MeterAction, ConfigurationError> {
        let password_first = changes.password.as_ref().is_some_and(|c| c.first_change);
        let error_first = changes.external_error.as_ref().is_some_and(|c| c.first_change);
        let error_raised = changes.external_error.as_ref().is_some_and(|c| c.current);

        let mut password_unchanged = true;
        if let Some(change) = changes.password {
            password_unchanged = !change.first_change
                && change
                    .previous
                    .as_ref()
                    .is_some_and(|p| p.expose_secret() == change.current.expose_secret());
            self.password = change.current;
            self.refresh_confirmation();
        }

        self.rebuild_if_config_changed()?;
        if !self.is_valid() {
            return Ok(MeterAction::Invalid);
        }

        let action = if password_first || error_first {
            MeterAction::Skipped
        } else if error_raised {
            self.color_override = Some(ColorBand::Warn);
            MeterAction::ExternalError
        } else if password_unchanged || !self.password.expose_secret().is_empty() {
            self.run_evaluation()?;
            MeterAction::Evaluated
        } else {
            self.reset();
            MeterAction::Reset
        };

        #[cfg(feature = "tracing")]
        tracing::debug!("Strength meter notification handled: {:?}", action);

        Ok(action)
    }

    /// Scores the current password, publishes the score, then rebuilds the
    /// registry if the configuration changed meanwhile.
    fn run_evaluation(&mut self) -> Result<EvaluationResult, ConfigurationError> {
        let result = match &self.registry {
            Some(registry) => evaluate(&self.password, registry, &self.config),
            None => EvaluationResult::reset(&self.config),
        };

        self.strength = result.score;
        self.flags = result.flags;
        self.color_override = None;

        (self.on_change)(self.strength);
        self.events.emit(self.strength);

        self.rebuild_if_config_changed()?;
        Ok(result)
    }
}
