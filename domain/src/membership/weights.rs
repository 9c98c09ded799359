//! Weighted membership resolution
//!
//! Members vote with weight 1 unless an override applies to them. Overrides
//! are keyed by raw id and match either the member id or any of the
//! member's role ids. Overrides are cumulative: each matching override adds
//! `value - 1` to the base weight of 1.
//!
//! # Example
//!
//! ```
//! use votum_domain::membership::{Member, WeightOverrides, compute_weights};
//!
//! let members = vec![
//!     Member::new("1", "Alice").with_role("elder"),
//!     Member::new("2", "Bob"),
//! ];
//! let mut overrides = WeightOverrides::new();
//! overrides.set("elder", 3.0).unwrap();
//!
//! let table = compute_weights(&members, &overrides);
//! assert_eq!(table.total(), 4.0);
//! assert_eq!(table.weight_of(&"1".into()), 3.0);
//! ```

use super::member::{Member, MemberId};
use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Weight of a member no override applies to.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Per-member and per-role weight overrides
///
/// A weight of exactly 1 is the same as no override and is never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightOverrides(BTreeMap<String, f64>);

impl WeightOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the override for a member or role id
    ///
    /// Setting a weight of 1 removes the override.
    pub fn set(&mut self, target: impl Into<String>, weight: f64) -> Result<(), ValidationError> {
        let target = target.into();
        if !weight.is_finite() || weight < 0.0 {
            return Err(ValidationError::NegativeWeight { target, weight });
        }

        if weight == DEFAULT_WEIGHT {
            self.0.remove(&target);
        } else {
            self.0.insert(target, weight);
        }
        Ok(())
    }

    pub fn get(&self, target: &str) -> Option<f64> {
        self.0.get(target).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Effective weight of one member
    ///
    /// A matching override of exactly 0 pins the member to 0. Otherwise the
    /// cumulative weight is floored at 0.
    pub fn weight_of(&self, member: &Member) -> f64 {
        let keys = std::iter::once(member.id.as_str())
            .chain(member.roles.iter().map(|r| r.as_str()));

        let mut weight = DEFAULT_WEIGHT;
        let mut zeroed = false;
        for value in keys.filter_map(|key| self.get(key)) {
            if value == 0.0 {
                zeroed = true;
            }
            weight += value - DEFAULT_WEIGHT;
        }

        if zeroed { 0.0 } else { weight.max(0.0) }
    }
}

/// Eligible vote weight of a council at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeightTable {
    total: f64,
    per_member: HashMap<MemberId, f64>,
}

impl WeightTable {
    /// Sum of all eligible members' weights
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Weight of a member, 1 for ids outside the electorate
    pub fn weight_of(&self, id: &MemberId) -> f64 {
        self.per_member.get(id).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    /// Whether the member is part of the electorate
    pub fn contains(&self, id: &MemberId) -> bool {
        self.per_member.contains_key(id)
    }

    /// Ids of all eligible members
    pub fn members(&self) -> impl Iterator<Item = &MemberId> {
        self.per_member.keys()
    }

    pub fn len(&self) -> usize {
        self.per_member.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_member.is_empty()
    }
}

/// Resolve the weight of every eligible member
///
/// Bots are skipped. A member listed twice is counted once.
pub fn compute_weights<'a>(
    members: impl IntoIterator<Item = &'a Member>,
    overrides: &WeightOverrides,
) -> WeightTable {
    let mut table = WeightTable::default();

    for member in members.into_iter().filter(|m| m.is_eligible()) {
        if table.per_member.contains_key(&member.id) {
            continue;
        }
        let weight = overrides.weight_of(member);
        table.total += weight;
        table.per_member.insert(member.id.clone(), weight);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(entries: &[(&str, f64)]) -> WeightOverrides {
        let mut overrides = WeightOverrides::new();
        for (target, weight) in entries {
            overrides.set(*target, *weight).unwrap();
        }
        overrides
    }

    #[test]
    fn test_empty_member_set() {
        let table = compute_weights(std::iter::empty(), &WeightOverrides::new());
        assert_eq!(table.total(), 0.0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_default_weights() {
        let members = vec![Member::new("1", "a"), Member::new("2", "b"), Member::new("3", "c")];
        let table = compute_weights(&members, &WeightOverrides::new());
        assert_eq!(table.total(), 3.0);
        assert_eq!(table.weight_of(&"2".into()), 1.0);
    }

    #[test]
    fn test_bots_excluded() {
        let members = vec![Member::new("1", "a"), Member::new("2", "bot").as_bot()];
        let table = compute_weights(&members, &WeightOverrides::new());
        assert_eq!(table.total(), 1.0);
        assert!(!table.contains(&"2".into()));
    }

    #[test]
    fn test_role_weights_are_cumulative() {
        let members = vec![Member::new("1", "a").with_role("r1").with_role("r2")];
        let table = compute_weights(&members, &overrides(&[("r1", 2.0), ("r2", 3.0)]));
        // 1 + (2 - 1) + (3 - 1)
        assert_eq!(table.total(), 4.0);
    }

    #[test]
    fn test_member_and_role_override_combine() {
        let members = vec![Member::new("1", "a").with_role("r1")];
        let table = compute_weights(&members, &overrides(&[("1", 1.5), ("r1", 2.0)]));
        assert_eq!(table.weight_of(&"1".into()), 2.5);
    }

    #[test]
    fn test_zero_override_pins_to_zero() {
        let members = vec![
            Member::new("1", "a").with_role("muted").with_role("elder"),
            Member::new("2", "b"),
        ];
        let table = compute_weights(&members, &overrides(&[("muted", 0.0), ("elder", 5.0)]));
        assert_eq!(table.weight_of(&"1".into()), 0.0);
        assert!(table.contains(&"1".into()));
        assert_eq!(table.total(), 1.0);
    }

    #[test]
    fn test_weight_never_negative() {
        let members = vec![Member::new("1", "a").with_role("r1").with_role("r2")];
        let table = compute_weights(&members, &overrides(&[("r1", 0.5), ("r2", 0.2)]));
        assert_eq!(table.weight_of(&"1".into()), 0.0);
    }

    #[test]
    fn test_duplicate_member_counted_once() {
        let members = vec![Member::new("1", "a"), Member::new("1", "a")];
        let table = compute_weights(&members, &WeightOverrides::new());
        assert_eq!(table.total(), 1.0);
    }

    #[test]
    fn test_unknown_member_defaults_to_one() {
        let table = compute_weights(std::iter::empty(), &WeightOverrides::new());
        assert_eq!(table.weight_of(&"ghost".into()), 1.0);
    }

    #[test]
    fn test_set_weight_one_removes_override() {
        let mut overrides = overrides(&[("r1", 2.0)]);
        overrides.set("r1", 1.0).unwrap();
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_set_negative_weight_rejected() {
        let mut overrides = WeightOverrides::new();
        let err = overrides.set("r1", -1.0).unwrap_err();
        assert!(matches!(err, ValidationError::NegativeWeight { .. }));
        assert!(overrides.is_empty());
    }
}
