//! Council configuration validation
//!
//! Detects settings that cannot work, or that work but probably not the way
//! the operator meant, and reports them as structured issues.
//!
//! # Examples
//!
//! ```
//! use votum_domain::council::CouncilConfig;
//! use votum_domain::council::validation::ConfigIssueCode;
//! use votum_domain::membership::Member;
//!
//! let mut config = CouncilConfig::default();
//! config.dictator_role = Some("chair".into());
//!
//! let issues = config.validate(&[Member::new("1", "Alice")]);
//! assert_eq!(issues[0].code, ConfigIssueCode::UnheldDictatorRole);
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The setting was ignored and a default used instead.
    Error,
    /// The setting is in effect but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A majority string could not be parsed or is outside (0, 1].
    InvalidMajority,
    /// A weight override is negative.
    NegativeWeight,
    /// A duration is negative, zero where it must not be, or not a number.
    InvalidDuration,
    /// The default majority is lower than the minimum motions may request.
    DefaultBelowMinimum,
    /// No roster member holds the configured dictator role.
    UnheldDictatorRole,
    /// A finish action forwards to the council it belongs to.
    ForwardToSelf,
    /// A finish action forwards to a council that is not configured.
    UnknownForwardTarget,
}

/// A detected issue in a council configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}
