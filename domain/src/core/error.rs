//! Domain error types

use crate::election::entity::ElectionPhase;
use crate::motion::entity::MotionResolution;
use std::time::Duration;
use thiserror::Error;

/// Domain-level errors
///
/// `Phase` and `InvalidState` signal caller misuse and should be logged,
/// not retried. `Validation` carries a user-facing rejection; the entity is
/// left untouched when it is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Operation `{operation}` is not allowed during the {phase} phase")]
    Phase {
        operation: &'static str,
        phase: ElectionPhase,
    },

    #[error("Motion #{motion} cannot move from {current} to {requested}")]
    InvalidState {
        motion: u32,
        current: MotionResolution,
        requested: MotionResolution,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Motion #{0} not found")]
    MotionNotFound(u32),

    #[error("No active motion")]
    NoActiveMotion,

    #[error("{0} motions are active, a motion number is required")]
    AmbiguousMotion(usize),

    #[error("Unknown council member: {0}")]
    UnknownMember(String),
}

impl DomainError {
    /// Check if this error is a user-input rejection rather than misuse
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }
}

/// Rejections of malformed user input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid majority: {0}")]
    InvalidMajority(String),

    #[error("Majority must be in (0, 1], got {0}")]
    MajorityOutOfRange(f64),

    #[error("Majority {requested} is below the council minimum of {minimum}")]
    MajorityBelowMinimum { requested: f64, minimum: f64 },

    #[error("Unknown motion option: {0}")]
    UnknownOption(String),

    #[error("Option {0} requires a value")]
    MissingOptionValue(String),

    #[error("Motion text is empty")]
    EmptyText,

    #[error("Motion text is {len} characters long, the limit is {max}")]
    TextTooLong { len: usize, max: usize },

    #[error("Motion creation is disabled in this council")]
    MotionsDisabled,

    #[error("Author must wait {} more minutes before proposing again", .remaining.as_secs().div_ceil(60))]
    OnCooldown { remaining: Duration },

    #[error("A reason is required for this vote")]
    ReasonRequired,

    #[error("Vote reason is {len} characters long, the limit is {max}")]
    ReasonTooLong { len: usize, max: usize },

    #[error("Weight for {target} must not be negative, got {weight}")]
    NegativeWeight { target: String, weight: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_error_display() {
        let error = DomainError::Phase {
            operation: "add_candidate",
            phase: ElectionPhase::Voting,
        };
        assert_eq!(
            error.to_string(),
            "Operation `add_candidate` is not allowed during the Voting phase"
        );
    }

    #[test]
    fn test_invalid_state_display() {
        let error = DomainError::InvalidState {
            motion: 3,
            current: MotionResolution::Passed,
            requested: MotionResolution::Killed,
        };
        assert_eq!(error.to_string(), "Motion #3 cannot move from Passed to Killed");
    }

    #[test]
    fn test_validation_is_transparent() {
        let error: DomainError = ValidationError::EmptyText.into();
        assert!(error.is_validation());
        assert_eq!(error.to_string(), "Motion text is empty");
        assert!(!DomainError::NoActiveMotion.is_validation());
    }

    #[test]
    fn test_cooldown_rounds_minutes_up() {
        let error = ValidationError::OnCooldown {
            remaining: Duration::from_secs(61),
        };
        assert_eq!(
            error.to_string(),
            "Author must wait 2 more minutes before proposing again"
        );
    }
}
