//! Password rules
//!
//! Each rule kind checks one aspect of the password. The patterns live here,
//! the registry decides which of them are active.

mod custom;
mod length;
mod variety;

pub use custom::parse_custom_pattern;
pub use length::{length_pattern, min_length_satisfied};
pub use variety::{digit_pattern, lower_case_pattern, special_char_pattern, upper_case_pattern};

use std::fmt;

/// The fixed set of rules a password is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    MinLength,
    LowerCase,
    UpperCase,
    Digit,
    SpecialChar,
    Custom,
}

impl RuleKind {
    /// Every rule kind, in registry order.
    pub const ALL: [RuleKind; 6] = [
        RuleKind::MinLength,
        RuleKind::LowerCase,
        RuleKind::UpperCase,
        RuleKind::Digit,
        RuleKind::SpecialChar,
        RuleKind::Custom,
    ];

    /// Key under which a failed rule is reported to the host form.
    ///
    /// Opaque identifier; the leading space of the special character key is
    /// part of the wire value hosts already match on.
    pub fn key(&self) -> &'static str {
        match self {
            RuleKind::MinLength => "minChar",
            RuleKind::LowerCase => "lowerCase",
            RuleKind::UpperCase => "upperCase",
            RuleKind::Digit => "digit",
            RuleKind::SpecialChar => " specialChar",
            RuleKind::Custom => "customChars",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key().trim_start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order() {
        assert_eq!(RuleKind::ALL[0], RuleKind::MinLength);
        assert_eq!(RuleKind::ALL[5], RuleKind::Custom);
    }

    #[test]
    fn test_special_char_key_is_opaque() {
        assert_eq!(RuleKind::SpecialChar.key(), " specialChar");
        assert_eq!(RuleKind::SpecialChar.to_string(), "specialChar");
    }
}
