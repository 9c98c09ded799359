//! Council aggregate
//!
//! A council owns its roster, configuration and motion history. It turns
//! member input into motion operations and translates every terminal
//! transition into a [`ResolutionReport`] the caller carries out.

use super::config::{CouncilConfig, MAX_MOTION_LENGTH, MAX_REASON_LENGTH};
use super::report::{ResolutionEffect, ResolutionReport};
use super::stats::{CouncilStats, MemberActivity};
use crate::core::error::{DomainError, ValidationError};
use crate::core::time::{Timestamp, elapsed};
use crate::membership::{Member, MemberId, WeightTable, compute_weights};
use crate::motion::{
    CastVoteStatus, Motion, MotionResolution, MotionResolved, Vote, VoteState, VotingContext,
    parse_motion_input,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Identifier of a council (usually the channel it lives in)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouncilId(String);

impl CouncilId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CouncilId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CouncilId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for CouncilId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a ballot reached the council
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteSource {
    #[default]
    Reaction,
    Command,
}

/// A member's vote as submitted, before council rules apply
#[derive(Debug, Clone, PartialEq)]
pub struct Ballot {
    pub author_id: MemberId,
    pub author_name: String,
    pub state: VoteState,
    pub reason: String,
    pub source: VoteSource,
}

impl Ballot {
    pub fn new(
        author_id: impl Into<MemberId>,
        author_name: impl Into<String>,
        state: VoteState,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            author_name: author_name.into(),
            state,
            reason: String::new(),
            source: VoteSource::default(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn via(mut self, source: VoteSource) -> Self {
        self.source = source;
        self
    }
}

/// Outcome of a vote cast through the council
#[derive(Debug, Clone, PartialEq)]
pub struct VoteReceipt {
    /// Motion number
    pub motion: u32,
    pub status: CastVoteStatus,
    pub resolution: Option<ResolutionReport>,
}

#[derive(Debug, Clone)]
pub struct Council {
    id: CouncilId,
    name: String,
    config: CouncilConfig,
    roster: Vec<Member>,
    motions: Vec<Motion>,
    /// Start of each author's current cooldown
    cooldowns: HashMap<MemberId, Timestamp>,
}

impl Council {
    pub fn new(id: impl Into<CouncilId>, name: impl Into<String>, config: CouncilConfig) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            config,
            roster: Vec::new(),
            motions: Vec::new(),
            cooldowns: HashMap::new(),
        }
    }

    pub fn with_roster(mut self, roster: Vec<Member>) -> Self {
        self.roster = roster;
        self
    }

    pub fn id(&self) -> &CouncilId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CouncilConfig {
        &self.config
    }

    pub fn roster(&self) -> &[Member] {
        &self.roster
    }

    pub fn set_roster(&mut self, roster: Vec<Member>) {
        self.roster = roster;
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.roster.iter().find(|m| &m.id == id)
    }

    pub fn motions(&self) -> &[Motion] {
        &self.motions
    }

    /// Motion by its 1-based number
    pub fn motion(&self, number: u32) -> Option<&Motion> {
        number
            .checked_sub(1)
            .and_then(|index| self.motions.get(index as usize))
    }

    pub fn active_motions(&self) -> Vec<&Motion> {
        self.motions.iter().filter(|m| m.is_active()).collect()
    }

    /// Current weights of the eligible roster
    pub fn weights(&self) -> WeightTable {
        compute_weights(&self.roster, &self.config.weights)
    }

    /// Resolve the motion an operation targets
    ///
    /// Without a number the only active motion is meant.
    pub fn target_motion(&self, number: Option<u32>) -> Result<u32, DomainError> {
        match number {
            Some(n) => self.motion(n).map(Motion::number).ok_or(DomainError::MotionNotFound(n)),
            None => match self.active_motions().as_slice() {
                [] => Err(DomainError::NoActiveMotion),
                [only] => Ok(only.number()),
                many => Err(DomainError::AmbiguousMotion(many.len())),
            },
        }
    }

    /// Time left before `member` may propose again
    pub fn cooldown_remaining(&self, member: &MemberId, now: Timestamp) -> Option<Duration> {
        let window = self.config.user_cooldown?;
        let started = *self.cooldowns.get(member)?;
        window
            .checked_sub(elapsed(started, now))
            .filter(|remaining| !remaining.is_zero())
    }

    /// Put a motion to the council on behalf of a roster member
    pub fn propose(
        &mut self,
        author: &MemberId,
        input: &str,
        now: Timestamp,
    ) -> Result<&Motion, DomainError> {
        let name = self
            .member(author)
            .map(|m| m.name.clone())
            .ok_or_else(|| DomainError::UnknownMember(author.to_string()))?;
        self.propose_as(author.clone(), name, input, now)
    }

    /// Put a motion to the council
    ///
    /// `input` may start with options (see [`parse_motion_input`]). The
    /// author does not need to be on the roster, which lets other councils
    /// forward motions here.
    pub fn propose_as(
        &mut self,
        author_id: MemberId,
        author_name: String,
        input: &str,
        now: Timestamp,
    ) -> Result<&Motion, DomainError> {
        if self.config.councilor_motion_disable {
            return Err(ValidationError::MotionsDisabled.into());
        }

        let (text, options) = parse_motion_input(input)?;
        if text.is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        let len = text.chars().count();
        if len > MAX_MOTION_LENGTH {
            return Err(ValidationError::TextTooLong {
                len,
                max: MAX_MOTION_LENGTH,
            }
            .into());
        }

        if let Some(remaining) = self.cooldown_remaining(&author_id, now) {
            return Err(ValidationError::OnCooldown { remaining }.into());
        }

        let majority = options.majority.unwrap_or(self.config.majority_default);
        if majority.value() < self.config.majority_minimum {
            return Err(ValidationError::MajorityBelowMinimum {
                requested: majority.value(),
                minimum: self.config.majority_minimum,
            }
            .into());
        }

        if self.config.user_cooldown_kill {
            self.cooldowns.insert(author_id.clone(), now);
        }

        let index = self.motions.len() as u32;
        self.motions
            .push(Motion::new(index, text, author_id, author_name, now, majority));
        Ok(&self.motions[index as usize])
    }

    /// Cast a ballot on a motion
    pub fn cast_vote(
        &mut self,
        number: Option<u32>,
        ballot: Ballot,
        now: Timestamp,
    ) -> Result<VoteReceipt, DomainError> {
        let number = self.target_motion(number)?;

        let len = ballot.reason.chars().count();
        if len > MAX_REASON_LENGTH {
            return Err(ValidationError::ReasonTooLong {
                len,
                max: MAX_REASON_LENGTH,
            }
            .into());
        }
        if self.config.reason_required(ballot.state) && ballot.reason.trim().is_empty() {
            return Err(ValidationError::ReasonRequired.into());
        }

        let vote = self.build_vote(ballot);
        let weights = self.weights();
        let ctx = VotingContext::new(&weights, self.config.voting_rules(), now);
        let outcome = self.motion_mut(number)?.cast_vote(vote, &ctx);

        Ok(VoteReceipt {
            motion: number,
            status: outcome.status,
            resolution: outcome.resolved.map(|resolved| self.settle(resolved)),
        })
    }

    /// Withdraw a member's vote
    pub fn retract_vote(
        &mut self,
        number: Option<u32>,
        author: &MemberId,
    ) -> Result<Option<Vote>, DomainError> {
        let number = self.target_motion(number)?;
        Ok(self.motion_mut(number)?.retract_vote(author))
    }

    /// Kill a motion; authorization is up to the caller
    pub fn kill(
        &mut self,
        number: Option<u32>,
        now: Timestamp,
    ) -> Result<ResolutionReport, DomainError> {
        self.resolve(number, MotionResolution::Killed, now)
    }

    /// Resolve a motion explicitly
    pub fn resolve(
        &mut self,
        number: Option<u32>,
        resolution: MotionResolution,
        now: Timestamp,
    ) -> Result<ResolutionReport, DomainError> {
        let number = self.target_motion(number)?;
        let weights = self.weights();
        let ctx = VotingContext::new(&weights, self.config.voting_rules(), now);
        let resolved = self.motion_mut(number)?.resolve(resolution, &ctx)?;
        Ok(self.settle(resolved))
    }

    /// Run the resolution check on every active motion
    ///
    /// This is how expired motions get resolved without a new vote.
    pub fn sweep(&mut self, now: Timestamp) -> Vec<ResolutionReport> {
        let weights = self.weights();
        let ctx = VotingContext::new(&weights, self.config.voting_rules(), now);

        let resolved: Vec<MotionResolved> = self
            .motions
            .iter_mut()
            .filter(|m| m.is_active())
            .filter_map(|m| m.check_resolution(&ctx))
            .collect();

        resolved.into_iter().map(|r| self.settle(r)).collect()
    }

    /// Eligible members who have not voted on a motion
    pub fn remaining_voters(&self, number: Option<u32>) -> Result<Vec<&Member>, DomainError> {
        let number = self.target_motion(number)?;
        let motion = self.motion(number).ok_or(DomainError::MotionNotFound(number))?;
        Ok(self
            .roster
            .iter()
            .filter(|m| m.is_eligible() && !motion.has_voted(&m.id))
            .collect())
    }

    /// Set the weight of a member or role; 1 removes the override
    pub fn set_weight(
        &mut self,
        target: impl Into<String>,
        weight: f64,
    ) -> Result<(), DomainError> {
        Ok(self.config.weights.set(target, weight)?)
    }

    /// Activity per member over the whole motion history
    pub fn stats(&self) -> CouncilStats {
        let mut members: Vec<MemberActivity> = self
            .roster
            .iter()
            .filter(|m| m.is_eligible())
            .map(|m| MemberActivity::new(m.id.clone(), m.name.clone()))
            .collect();

        fn entry<'a>(
            members: &'a mut Vec<MemberActivity>,
            id: &MemberId,
            name: &str,
        ) -> &'a mut MemberActivity {
            match members.iter().position(|a| &a.id == id) {
                Some(i) => &mut members[i],
                None => {
                    members.push(MemberActivity::new(id.clone(), name));
                    let last = members.len() - 1;
                    &mut members[last]
                }
            }
        }

        for motion in &self.motions {
            let author = entry(&mut members, motion.author_id(), motion.author_name());
            author.motions += 1;
            if motion.resolution() == MotionResolution::Passed {
                author.passed += 1;
            }
            author.last_motion = author.last_motion.max(Some(motion.created_at()));

            for vote in motion.votes() {
                let voter = entry(&mut members, &vote.author_id, &vote.author_name);
                voter.last_vote = voter.last_vote.max(Some(motion.created_at()));
            }
        }

        CouncilStats {
            total_motions: self.motions.len(),
            members,
        }
    }

    fn motion_mut(&mut self, number: u32) -> Result<&mut Motion, DomainError> {
        number
            .checked_sub(1)
            .and_then(|index| self.motions.get_mut(index as usize))
            .ok_or(DomainError::MotionNotFound(number))
    }

    fn build_vote(&self, ballot: Ballot) -> Vote {
        let is_dictator = self.config.dictator_role.as_ref().is_some_and(|role| {
            self.member(&ballot.author_id)
                .is_some_and(|m| m.has_role(role))
        });
        let name = match ballot.source {
            VoteSource::Reaction => ballot.state.label().to_string(),
            VoteSource::Command => format!("{} (command)", ballot.state.label()),
        };

        let mut vote = Vote::new(ballot.author_id, ballot.author_name, ballot.state)
            .with_name(name)
            .with_reason(ballot.reason);
        if is_dictator {
            vote = vote.as_dictator();
        }
        vote
    }

    /// Bookkeeping and effects of a terminal transition
    fn settle(&mut self, resolved: MotionResolved) -> ResolutionReport {
        let config = &self.config;
        let mut effects = Vec::new();

        let decided = matches!(
            resolved.resolution,
            MotionResolution::Passed | MotionResolution::Failed
        );
        if decided && !config.user_cooldown_kill {
            self.cooldowns
                .insert(resolved.author_id.clone(), resolved.created_at);
            if let Some(channel) = &config.announce_channel {
                effects.push(ResolutionEffect::Announce {
                    channel: channel.clone(),
                });
            }
        }

        let per_resolution = match resolved.resolution {
            MotionResolution::Passed => config.on_passed_announce.as_ref(),
            MotionResolution::Failed => config.on_failed_announce.as_ref(),
            MotionResolution::Killed => config.on_killed_announce.as_ref(),
            MotionResolution::Unresolved => None,
        };
        if let Some(channel) = per_resolution {
            effects.push(ResolutionEffect::Announce {
                channel: channel.clone(),
            });
        }

        if config.create_deliberation_channels {
            effects.push(ResolutionEffect::CloseDeliberation {
                archive_transcript: config.keep_transcripts,
            });
        }

        let finish_actions = config
            .finish_actions
            .select(resolved.resolution, resolved.required_majority);

        ResolutionReport {
            motion: resolved,
            effects,
            finish_actions,
        }
    }
}
