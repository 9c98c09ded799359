//! Council configuration

use super::finish::FinishActions;
use super::validation::{ConfigIssue, ConfigIssueCode};
use crate::membership::{Member, RoleId, WeightOverrides};
use crate::motion::{Majority, VoteState, VotingRules};
use std::time::Duration;

/// Longest motion text accepted
pub const MAX_MOTION_LENGTH: usize = 2000;
/// Longest vote reason accepted
pub const MAX_REASON_LENGTH: usize = 1000;

/// Rules and integrations of one council
#[derive(Debug, Clone, PartialEq)]
pub struct CouncilConfig {
    /// Majority of motions that do not request one
    pub majority_default: Majority,
    /// Lowest majority a motion may request, 0 for no floor
    pub majority_minimum: f64,
    /// Resolve as soon as a majority is reached
    pub majority_reached_ends: bool,
    pub motion_expiration: Option<Duration>,
    /// Time an author must wait between motions
    pub user_cooldown: Option<Duration>,
    /// Start the cooldown when the motion is proposed rather than resolved
    pub user_cooldown_kill: bool,
    pub councilor_motion_disable: bool,
    /// Holders of this role resolve a motion with their vote
    pub dictator_role: Option<RoleId>,
    pub reason_required_yes: bool,
    pub reason_required_no: bool,
    pub reason_required_abstain: bool,
    pub announce_channel: Option<String>,
    pub on_passed_announce: Option<String>,
    pub on_failed_announce: Option<String>,
    pub on_killed_announce: Option<String>,
    /// Every motion gets its own deliberation room
    pub create_deliberation_channels: bool,
    /// Archive a transcript when a deliberation room closes
    pub keep_transcripts: bool,
    pub weights: WeightOverrides,
    pub finish_actions: FinishActions,
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self {
            majority_default: Majority::SIMPLE,
            majority_minimum: 0.0,
            majority_reached_ends: false,
            motion_expiration: None,
            user_cooldown: None,
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
            weights: WeightOverrides::default(),
            finish_actions: FinishActions::default(),
        }
    }
}

impl CouncilConfig {
    pub fn voting_rules(&self) -> VotingRules {
        VotingRules {
            expiration: self.motion_expiration,
            majority_reached_ends: self.majority_reached_ends,
        }
    }

    pub fn reason_required(&self, state: VoteState) -> bool {
        match state {
            VoteState::For => self.reason_required_yes,
            VoteState::Against => self.reason_required_no,
            VoteState::Abstain => self.reason_required_abstain,
        }
    }

    /// Check the settings against each other and the roster
    pub fn validate(&self, roster: &[Member]) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.majority_default.value() < self.majority_minimum {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DefaultBelowMinimum,
                format!(
                    "Default majority {} is below the minimum of {}; motions without \
                     an explicit majority will be rejected",
                    self.majority_default, self.majority_minimum
                ),
            ));
        }

        if let Some(role) = &self.dictator_role
            && !roster.iter().any(|m| m.has_role(role))
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnheldDictatorRole,
                format!("No roster member holds the dictator role `{}`", role),
            ));
        }

        issues
    }
}
