//! Required majority of a motion
//!
//! # Example
//!
//! ```
//! use votum_domain::motion::Majority;
//!
//! let m: Majority = "2/3".parse().unwrap();
//! assert!((m.value() - 2.0 / 3.0).abs() < 1e-9);
//!
//! assert_eq!("75%".parse::<Majority>().unwrap().value(), 0.75);
//! assert!("unanimous".parse::<Majority>().unwrap().is_unanimous());
//! assert!("0".parse::<Majority>().is_err());
//! ```

use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Fraction of the total weight one side needs, in (0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Majority(f64);

impl Majority {
    /// More than half
    pub const SIMPLE: Majority = Majority(0.5);
    /// Everyone
    pub const UNANIMOUS: Majority = Majority(1.0);

    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(ValidationError::MajorityOutOfRange(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_unanimous(self) -> bool {
        self.0 >= 1.0
    }

    /// Loose comparison used to match configured majorities
    pub fn approx_eq(self, other: f64) -> bool {
        (self.0 - other).abs() < 0.01
    }
}

impl Default for Majority {
    fn default() -> Self {
        Self::SIMPLE
    }
}

impl TryFrom<f64> for Majority {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Majority> for f64 {
    fn from(majority: Majority) -> Self {
        majority.0
    }
}

impl std::fmt::Display for Majority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let percent = (self.0 * 10_000.0).round() / 100.0;
        write!(f, "{}%", percent)
    }
}

impl std::str::FromStr for Majority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let invalid = || ValidationError::InvalidMajority(s.to_string());

        let value = match input.as_str() {
            "unanimous" | "unanimity" => 1.0,
            "simple" | "majority" => 0.5,
            p if p.ends_with('%') => {
                let percent: f64 = p.trim_end_matches('%').trim().parse().map_err(|_| invalid())?;
                percent / 100.0
            }
            f if f.contains('/') => {
                let (num, den) = f.split_once('/').ok_or_else(invalid)?;
                let num: f64 = num.trim().parse().map_err(|_| invalid())?;
                let den: f64 = den.trim().parse().map_err(|_| invalid())?;
                if den == 0.0 {
                    return Err(invalid());
                }
                num / den
            }
            d => d.parse().map_err(|_| invalid())?,
        };

        Self::new(value)
    }
}
