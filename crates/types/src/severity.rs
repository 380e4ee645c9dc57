//! Severity types for lint rules.

use std::str::FromStr;

/// Rule severity for lint configuration.
///
/// This represents how a lint rule should be reported, as configured
/// by the user. Rules that are not mentioned in the configuration are off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum RuleSeverity {
    /// Rule is disabled (default for unconfigured rules)
    #[default]
    Off,
    /// Rule violations are reported as warnings
    Warning,
    /// Rule violations are reported as errors
    Error,
}

impl RuleSeverity {
    /// Returns true if the rule is enabled (warning or error).
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Returns true if this severity indicates an error.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

impl std::fmt::Display for RuleSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Error returned when a severity token is not one of `off`, `warning`, `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSeverity(pub String);

impl std::fmt::Display for UnknownSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown severity: {}", self.0)
    }
}

impl std::error::Error for UnknownSeverity {}

impl FromStr for RuleSeverity {
    type Err = UnknownSeverity;

    /// Parses a severity name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("off") {
            Ok(Self::Off)
        } else if s.eq_ignore_ascii_case("warning") {
            Ok(Self::Warning)
        } else if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else {
            Err(UnknownSeverity(s.to_string()))
        }
    }
}
