//! Council configuration from TOML (`[council]` and `[[councils]]` sections)
//!
//! Example configuration:
//!
//! ```toml
//! [council]
//! id = "assembly"
//! name = "General Assembly"
//! majority_default = "50%"
//! majority_minimum = "1/3"
//! motion_expiration_hours = 48
//! user_cooldown_hours = 12
//! dictator_role = "chair"
//! reason_required_no = true
//! announce_channel = "announcements"
//!
//! [council.weights]
//! elder = 2.0
//!
//! [[council.finish_actions.passed]]
//! action = "forward"
//! to = "senate"
//! options = "-u"
//! at_majority = 0.5
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use votum_domain::{
    ConfigIssue, ConfigIssueCode, CouncilConfig, FinishActions, Majority, RoleId,
};

/// One council as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    pub id: String,
    pub name: String,
    /// "50%", "2/3", "0.75", "unanimous"
    pub majority_default: String,
    /// Lowest majority a motion may request; unset for no floor
    pub majority_minimum: Option<String>,
    pub majority_reached_ends: bool,
    pub motion_expiration_hours: Option<f64>,
    pub user_cooldown_hours: Option<f64>,
    pub user_cooldown_kill: bool,
    pub councilor_motion_disable: bool,
    pub dictator_role: Option<String>,
    pub reason_required_yes: bool,
    pub reason_required_no: bool,
    pub reason_required_abstain: bool,
    pub announce_channel: Option<String>,
    pub on_passed_announce: Option<String>,
    pub on_failed_announce: Option<String>,
    pub on_killed_announce: Option<String>,
    pub create_deliberation_channels: bool,
    pub keep_transcripts: bool,
    /// Member or role id → weight
    pub weights: BTreeMap<String, f64>,
    pub finish_actions: FinishActions,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            id: "general".to_string(),
            name: "General".to_string(),
            majority_default: "50%".to_string(),
            majority_minimum: None,
            majority_reached_ends: false,
            motion_expiration_hours: None,
            user_cooldown_hours: None,
            user_cooldown_kill: false,
            councilor_motion_disable: false,
            dictator_role: None,
            reason_required_yes: false,
            reason_required_no: false,
            reason_required_abstain: false,
            announce_channel: None,
            on_passed_announce: None,
            on_failed_announce: None,
            on_killed_announce: None,
            create_deliberation_channels: false,
            keep_transcripts: false,
            weights: BTreeMap::new(),
            finish_actions: FinishActions::default(),
        }
    }
}

impl FileCouncilConfig {
    /// Convert to the domain configuration
    ///
    /// Invalid entries fall back to their defaults and are reported.
    pub fn to_council_config(&self) -> (CouncilConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let field = |name: &str| format!("councils.{}.{}", self.id, name);

        let majority_default = match self.majority_default.parse::<Majority>() {
            Ok(m) => m,
            Err(e) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidMajority,
                    format!("{}: {}, falling back to 50%", field("majority_default"), e),
                ));
                Majority::SIMPLE
            }
        };

        let majority_minimum = match self.majority_minimum.as_deref().map(str::trim) {
            None | Some("0") | Some("0%") => 0.0,
            Some(raw) => match raw.parse::<Majority>() {
                Ok(m) => m.value(),
                Err(e) => {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::InvalidMajority,
                        format!("{}: {}, no minimum applied", field("majority_minimum"), e),
                    ));
                    0.0
                }
            },
        };

        let mut weights = votum_domain::WeightOverrides::new();
        for (target, weight) in &self.weights {
            if let Err(e) = weights.set(target.as_str(), *weight) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::NegativeWeight,
                    format!("{}: {}, ignored", field("weights"), e),
                ));
            }
        }

        let config = CouncilConfig {
            majority_default,
            majority_minimum,
            majority_reached_ends: self.majority_reached_ends,
            motion_expiration: hours(
                self.motion_expiration_hours,
                &field("motion_expiration_hours"),
                &mut issues,
            ),
            user_cooldown: hours(
                self.user_cooldown_hours,
                &field("user_cooldown_hours"),
                &mut issues,
            ),
            user_cooldown_kill: self.user_cooldown_kill,
            councilor_motion_disable: self.councilor_motion_disable,
            dictator_role: self.dictator_role.as_deref().map(RoleId::from),
            reason_required_yes: self.reason_required_yes,
            reason_required_no: self.reason_required_no,
            reason_required_abstain: self.reason_required_abstain,
            announce_channel: self.announce_channel.clone(),
            on_passed_announce: self.on_passed_announce.clone(),
            on_failed_announce: self.on_failed_announce.clone(),
            on_killed_announce: self.on_killed_announce.clone(),
            create_deliberation_channels: self.create_deliberation_channels,
            keep_transcripts: self.keep_transcripts,
            weights,
            finish_actions: self.finish_actions.clone(),
        };

        if self.finish_actions.all().any(|a| a.to == self.id) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ForwardToSelf,
                format!(
                    "{}: forwards motions back to the same council",
                    field("finish_actions")
                ),
            ));
        }

        (config, issues)
    }
}

fn hours(value: Option<f64>, field: &str, issues: &mut Vec<ConfigIssue>) -> Option<Duration> {
    let hours = value?;
    match Duration::try_from_secs_f64(hours * 3600.0) {
        Ok(d) if !d.is_zero() => Some(d),
        _ => {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidDuration,
                format!("{}: {} is not a positive number of hours, ignored", field, hours),
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_converts_cleanly() {
        let (config, issues) = FileCouncilConfig::default().to_council_config();
        assert!(issues.is_empty());
        assert_eq!(config, CouncilConfig::default());
    }

    #[test]
    fn test_deserialize_and_convert() {
        let toml_str = r#"
id = "assembly"
name = "General Assembly"
majority_default = "2/3"
majority_minimum = "50%"
motion_expiration_hours = 1.5
dictator_role = "chair"
reason_required_no = true

[weights]
elder = 2.0
"7" = 0.0

[[finish_actions.passed]]
action = "forward"
to = "senate"
options = "-u"
"#;
        let file: FileCouncilConfig = toml::from_str(toml_str).unwrap();
        let (config, issues) = file.to_council_config();

        assert!(issues.is_empty());
        assert!(config.majority_default.approx_eq(0.667));
        assert_eq!(config.majority_minimum, 0.5);
        assert_eq!(config.motion_expiration, Some(Duration::from_secs(5400)));
        assert_eq!(config.dictator_role, Some(RoleId::from("chair")));
        assert!(config.reason_required_no);
        assert_eq!(config.weights.get("elder"), Some(2.0));
        assert_eq!(config.weights.get("7"), Some(0.0));
        assert_eq!(config.finish_actions.passed[0].to, "senate");
    }

    #[test]
    fn test_invalid_entries_fall_back() {
        let file = FileCouncilConfig {
            majority_default: "most".to_string(),
            majority_minimum: Some("2".to_string()),
            user_cooldown_hours: Some(-1.0),
            weights: BTreeMap::from([("troll".to_string(), -3.0), ("elder".to_string(), 2.0)]),
            ..Default::default()
        };
        let (config, issues) = file.to_council_config();

        let codes: Vec<_> = issues.iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                ConfigIssueCode::InvalidMajority,
                ConfigIssueCode::InvalidMajority,
                ConfigIssueCode::NegativeWeight,
                ConfigIssueCode::InvalidDuration,
            ]
        );
        assert_eq!(config.majority_default, Majority::SIMPLE);
        assert_eq!(config.majority_minimum, 0.0);
        assert_eq!(config.user_cooldown, None);
        assert_eq!(config.weights.len(), 1);
    }

    #[test]
    fn test_forward_to_self_warns() {
        let mut file = FileCouncilConfig::default();
        file.finish_actions
            .killed
            .push(votum_domain::FinishAction::forward("general"));
        let (_, issues) = file.to_council_config();
        assert_eq!(issues[0].code, ConfigIssueCode::ForwardToSelf);
    }
}
