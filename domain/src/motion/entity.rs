//! Motion entity and its resolution state machine
//!
//! ```text
//!                 cast_vote / check_resolution / resolve
//!   Unresolved ───────────────────────────────────────────▶ Passed | Failed | Killed
//!   (active)                                                 (terminal, inactive)
//! ```
//!
//! A motion leaves `Unresolved` exactly once. Every terminal transition goes
//! through one internal step that records the outcome and hands a
//! [`MotionResolved`] back to the caller, which owns all side effects.

use super::majority::Majority;
use super::tally::{Tally, tally};
use super::vote::{CastVoteStatus, Vote, VoteState};
use crate::core::error::DomainError;
use crate::core::time::{Timestamp, elapsed};
use crate::membership::{MemberId, WeightTable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resolution of a motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionResolution {
    Unresolved,
    Killed,
    Passed,
    Failed,
}

impl MotionResolution {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MotionResolution::Unresolved)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MotionResolution::Unresolved => "unresolved",
            MotionResolution::Killed => "killed",
            MotionResolution::Passed => "passed",
            MotionResolution::Failed => "failed",
        }
    }
}

impl std::fmt::Display for MotionResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotionResolution::Unresolved => write!(f, "Unresolved"),
            MotionResolution::Killed => write!(f, "Killed"),
            MotionResolution::Passed => write!(f, "Passed"),
            MotionResolution::Failed => write!(f, "Failed"),
        }
    }
}

/// Council rules a motion consults while it is open
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VotingRules {
    /// Motions older than this expire; `None` never expires
    pub expiration: Option<Duration>,
    /// Resolve as soon as a majority is reached instead of waiting for
    /// every eligible member to vote
    pub majority_reached_ends: bool,
}

/// Read-only inputs of one motion operation
#[derive(Debug, Clone, Copy)]
pub struct VotingContext<'a> {
    pub weights: &'a WeightTable,
    pub rules: VotingRules,
    pub now: Timestamp,
}

impl<'a> VotingContext<'a> {
    pub fn new(weights: &'a WeightTable, rules: VotingRules, now: Timestamp) -> Self {
        Self { weights, rules, now }
    }
}

/// Record of a terminal transition, handed to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionResolved {
    pub motion: u32,
    pub text: String,
    pub author_id: MemberId,
    pub author_name: String,
    pub created_at: Timestamp,
    pub resolution: MotionResolution,
    pub required_majority: Majority,
    pub did_expire: bool,
    pub tally: Tally,
}

/// Result of casting a vote
#[derive(Debug, Clone, PartialEq)]
pub struct CastOutcome {
    pub status: CastVoteStatus,
    /// Present when this vote ended the motion
    pub resolved: Option<MotionResolved>,
}

/// A proposal put to a council's vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    index: u32,
    text: String,
    author_id: MemberId,
    author_name: String,
    created_at: Timestamp,
    votes: Vec<Vote>,
    resolution: MotionResolution,
    active: bool,
    required_majority: Majority,
    did_expire: bool,
}

impl Motion {
    pub fn new(
        index: u32,
        text: impl Into<String>,
        author_id: impl Into<MemberId>,
        author_name: impl Into<String>,
        created_at: Timestamp,
        required_majority: Majority,
    ) -> Self {
        Self {
            index,
            text: text.into(),
            author_id: author_id.into(),
            author_name: author_name.into(),
            created_at,
            votes: Vec::new(),
            resolution: MotionResolution::Unresolved,
            active: true,
            required_majority,
            did_expire: false,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// 1-based number shown to members
    pub fn number(&self) -> u32 {
        self.index + 1
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author_id(&self) -> &MemberId {
        &self.author_id
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn resolution(&self) -> MotionResolution {
        self.resolution
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn required_majority(&self) -> Majority {
        self.required_majority
    }

    pub fn did_expire(&self) -> bool {
        self.did_expire
    }

    pub fn vote_of(&self, author: &MemberId) -> Option<&Vote> {
        self.votes.iter().find(|v| &v.author_id == author)
    }

    pub fn has_voted(&self, author: &MemberId) -> bool {
        self.vote_of(author).is_some()
    }

    /// Whether the motion is older than `window`
    pub fn is_expired(&self, now: Timestamp, window: Option<Duration>) -> bool {
        window.is_some_and(|window| elapsed(self.created_at, now) > window)
    }

    pub fn tally(&self, weights: &WeightTable) -> Tally {
        tally(&self.votes, self.required_majority, weights.total(), weights)
    }

    /// Eligible members who have not voted yet
    pub fn remaining_voters<'w>(&self, weights: &'w WeightTable) -> Vec<&'w MemberId> {
        weights.members().filter(|id| !self.has_voted(id)).collect()
    }

    /// Record a vote, replacing any earlier vote by the same author
    ///
    /// A dictator's decisive vote fixes the outcome and skips the majority
    /// check; the vote is still recorded. Votes on an inactive motion are not
    /// recorded and report [`CastVoteStatus::Failed`].
    pub fn cast_vote(&mut self, vote: Vote, ctx: &VotingContext<'_>) -> CastOutcome {
        if !self.active {
            return CastOutcome {
                status: CastVoteStatus::Failed,
                resolved: None,
            };
        }

        if vote.is_override() {
            let resolution = match vote.state {
                VoteState::For => MotionResolution::Passed,
                _ => MotionResolution::Failed,
            };
            // Outcome is fixed before the vote lands; the record keeps it for the tally
            let status = self.upsert(vote);
            let resolved = Some(self.finish(resolution, ctx));
            return CastOutcome { status, resolved };
        }

        let status = self.upsert(vote);
        let resolved = self.check_resolution(ctx);

        CastOutcome { status, resolved }
    }

    /// Remove the author's vote, if any
    ///
    /// Retracting never resolves a motion. The record of a resolved motion
    /// is frozen.
    pub fn retract_vote(&mut self, author: &MemberId) -> Option<Vote> {
        if !self.active {
            return None;
        }
        let position = self.votes.iter().position(|v| &v.author_id == author)?;
        Some(self.votes.remove(position))
    }

    /// Resolve the motion if the votes or its age decide it
    ///
    /// Runs after every ordinary vote and on the caller's schedule to catch
    /// expiry. First match wins:
    ///
    /// 1. expired: more yes passes, more no fails, a tie waits for one more vote;
    /// 2. nothing else is tried until every eligible member has voted, unless
    ///    the council resolves as soon as a majority is reached;
    /// 3. yes reaching `to_pass` passes; no reaching it, or a zero
    ///    `to_pass`, fails; a yes majority that can no longer be reached fails.
    pub fn check_resolution(&mut self, ctx: &VotingContext<'_>) -> Option<MotionResolved> {
        if self.resolution.is_terminal() {
            return None;
        }

        let votes = self.tally(ctx.weights);

        if self.is_expired(ctx.now, ctx.rules.expiration) {
            if votes.yes > votes.no {
                return Some(self.finish(MotionResolution::Passed, ctx));
            }
            if votes.no > votes.yes {
                return Some(self.finish(MotionResolution::Failed, ctx));
            }
            return None;
        }

        let everyone_voted = ctx.weights.members().all(|id| self.has_voted(id));
        if !ctx.rules.majority_reached_ends && !everyone_voted {
            return None;
        }

        let resolution = if votes.yes >= votes.to_pass {
            MotionResolution::Passed
        } else if votes.no >= votes.to_pass || votes.to_pass == 0.0 {
            MotionResolution::Failed
        } else if votes.open_weight(ctx.weights.total()) < votes.to_pass {
            MotionResolution::Failed
        } else {
            return None;
        };

        Some(self.finish(resolution, ctx))
    }

    /// Resolve the motion explicitly
    ///
    /// Fails with [`DomainError::InvalidState`] when the motion is already
    /// resolved or when `resolution` is not terminal.
    pub fn resolve(
        &mut self,
        resolution: MotionResolution,
        ctx: &VotingContext<'_>,
    ) -> Result<MotionResolved, DomainError> {
        if !self.active || !resolution.is_terminal() {
            return Err(DomainError::InvalidState {
                motion: self.number(),
                current: self.resolution,
                requested: resolution,
            });
        }

        Ok(self.finish(resolution, ctx))
    }

    fn upsert(&mut self, vote: Vote) -> CastVoteStatus {
        match self.votes.iter_mut().find(|v| v.author_id == vote.author_id) {
            Some(existing) => {
                *existing = vote;
                CastVoteStatus::Changed
            }
            None => {
                self.votes.push(vote);
                CastVoteStatus::New
            }
        }
    }

    fn finish(&mut self, resolution: MotionResolution, ctx: &VotingContext<'_>) -> MotionResolved {
        self.active = false;
        self.resolution = resolution;
        self.did_expire = self.is_expired(ctx.now, ctx.rules.expiration);

        MotionResolved {
            motion: self.number(),
            text: self.text.clone(),
            author_id: self.author_id.clone(),
            author_name: self.author_name.clone(),
            created_at: self.created_at,
            resolution,
            required_majority: self.required_majority,
            did_expire: self.did_expire,
            tally: self.tally(ctx.weights),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::{Member, WeightOverrides, compute_weights};

    const HOUR: u64 = 3_600_000;

    fn electorate(n: usize) -> WeightTable {
        let members: Vec<Member> = (1..=n)
            .map(|i| Member::new(i.to_string(), format!("m{}", i)))
            .collect();
        compute_weights(&members, &WeightOverrides::new())
    }

    fn motion(majority: Majority) -> Motion {
        Motion::new(0, "Adopt the charter", "1", "m1", 0, majority)
    }

    fn vote(author: &str, state: VoteState) -> Vote {
        Vote::new(author, format!("m{}", author), state)
    }

    fn eager() -> VotingRules {
        VotingRules {
            expiration: None,
            majority_reached_ends: true,
        }
    }

    #[test]
    fn test_new_motion_is_active() {
        let m = motion(Majority::SIMPLE);
        assert!(m.is_active());
        assert_eq!(m.resolution(), MotionResolution::Unresolved);
        assert_eq!(m.number(), 1);
    }

    #[test]
    fn test_cast_vote_upserts_by_author() {
        let weights = electorate(5);
        let ctx = VotingContext::new(&weights, VotingRules::default(), 0);
        let mut m = motion(Majority::SIMPLE);

        assert_eq!(m.cast_vote(vote("1", VoteState::For), &ctx).status, CastVoteStatus::New);
        assert_eq!(
            m.cast_vote(vote("1", VoteState::Against), &ctx).status,
            CastVoteStatus::Changed
        );
        assert_eq!(m.cast_vote(vote("2", VoteState::For), &ctx).status, CastVoteStatus::New);

        assert_eq!(m.votes().len(), 2);
        assert_eq!(m.vote_of(&"1".into()).unwrap().state, VoteState::Against);
    }

    #[test]
    fn test_majority_scenario_passes_on_second_yes() {
        let weights = electorate(3);
        let ctx = VotingContext::new(&weights, eager(), 0);
        let mut m = motion(Majority::SIMPLE);

        assert!(m.cast_vote(vote("1", VoteState::For), &ctx).resolved.is_none());
        let outcome = m.cast_vote(vote("2", VoteState::For), &ctx);

        let resolved = outcome.resolved.unwrap();
        assert_eq!(resolved.resolution, MotionResolution::Passed);
        assert_eq!(resolved.tally.yes, 2.0);
        assert_eq!(resolved.tally.to_pass, 2.0);
        assert!(!m.is_active());

        // Third vote is absorbed
        let late = m.cast_vote(vote("3", VoteState::Against), &ctx);
        assert_eq!(late.status, CastVoteStatus::Failed);
        assert_eq!(m.resolution(), MotionResolution::Passed);
    }

    #[test]
    fn test_waits_for_everyone_by_default() {
        let weights = electorate(3);
        let ctx = VotingContext::new(&weights, VotingRules::default(), 0);
        let mut m = motion(Majority::SIMPLE);

        m.cast_vote(vote("1", VoteState::For), &ctx);
        assert!(m.cast_vote(vote("2", VoteState::For), &ctx).resolved.is_none());
        assert!(m.is_active());

        let outcome = m.cast_vote(vote("3", VoteState::Against), &ctx);
        assert_eq!(outcome.resolved.unwrap().resolution, MotionResolution::Passed);
        let t = m.tally(&weights);
        assert_eq!((t.yes, t.no, t.to_pass), (2.0, 1.0, 2.0));
    }

    #[test]
    fn test_no_majority_fails() {
        let weights = electorate(3);
        let ctx = VotingContext::new(&weights, eager(), 0);
        let mut m = motion(Majority::SIMPLE);

        m.cast_vote(vote("1", VoteState::Against), &ctx);
        let outcome = m.cast_vote(vote("2", VoteState::Against), &ctx);
        assert_eq!(outcome.resolved.unwrap().resolution, MotionResolution::Failed);
    }

    #[test]
    fn test_stalemate_fails() {
        // Unanimity among 3: one abstention makes 3 yes unreachable
        let weights = electorate(3);
        let ctx = VotingContext::new(&weights, eager(), 0);
        let mut m = motion(Majority::UNANIMOUS);

        m.cast_vote(vote("1", VoteState::For), &ctx);
        let outcome = m.cast_vote(vote("2", VoteState::Abstain), &ctx);
        assert_eq!(outcome.resolved.unwrap().resolution, MotionResolution::Failed);
    }

    #[test]
    fn test_all_abstain_fails() {
        let weights = electorate(2);
        let ctx = VotingContext::new(&weights, VotingRules::default(), 0);
        let mut m = motion(Majority::SIMPLE);

        m.cast_vote(vote("1", VoteState::Abstain), &ctx);
        let outcome = m.cast_vote(vote("2", VoteState::Abstain), &ctx);
        assert_eq!(outcome.resolved.unwrap().resolution, MotionResolution::Failed);
    }

    #[test]
    fn test_dictator_override_passes_immediately() {
        let weights = electorate(5);
        let ctx = VotingContext::new(&weights, VotingRules::default(), 0);
        let mut m = motion(Majority::UNANIMOUS);

        m.cast_vote(vote("2", VoteState::Against), &ctx);
        m.cast_vote(vote("3", VoteState::Against), &ctx);
        let outcome = m.cast_vote(vote("4", VoteState::For).as_dictator(), &ctx);

        assert_eq!(outcome.status, CastVoteStatus::New);
        let resolved = outcome.resolved.unwrap();
        assert_eq!(resolved.resolution, MotionResolution::Passed);
        assert!(resolved.tally.dictator_voted);
        assert_eq!(m.resolution(), MotionResolution::Passed);
        assert_eq!(m.votes().len(), 3);
    }

    #[test]
    fn test_dictator_abstain_is_ordinary() {
        let weights = electorate(3);
        let ctx = VotingContext::new(&weights, VotingRules::default(), 0);
        let mut m = motion(Majority::SIMPLE);

        let outcome = m.cast_vote(vote("1", VoteState::Abstain).as_dictator(), &ctx);
        assert!(outcome.resolved.is_none());
        assert!(m.is_active());
    }

    #[test]
    fn test_retract_vote() {
        let weights = electorate(3);
        let ctx = VotingContext::new(&weights, VotingRules::default(), 0);
        let mut m = motion(Majority::SIMPLE);

        m.cast_vote(vote("1", VoteState::For), &ctx);
        assert!(m.retract_vote(&"1".into()).is_some());
        assert!(m.retract_vote(&"1".into()).is_none());
        assert!(m.votes().is_empty());
        assert!(m.is_active());
    }

    #[test]
    fn test_expiration() {
        let m = motion(Majority::SIMPLE);
        let window = Some(Duration::from_millis(2 * HOUR));
        assert!(!m.is_expired(2 * HOUR, window));
        assert!(m.is_expired(2 * HOUR + 1, window));
        assert!(!m.is_expired(100 * HOUR, None));
    }

    #[test]
    fn test_expired_motion_resolves_on_lead() {
        let weights = electorate(10);
        let rules = VotingRules {
            expiration: Some(Duration::from_millis(HOUR)),
            majority_reached_ends: false,
        };
        let mut m = motion(Majority::SIMPLE);

        let early = VotingContext::new(&weights, rules, 10);
        m.cast_vote(vote("1", VoteState::For), &early);
        assert!(m.is_active());

        let late = VotingContext::new(&weights, rules, 2 * HOUR);
        let resolved = m.check_resolution(&late).unwrap();
        assert_eq!(resolved.resolution, MotionResolution::Passed);
        assert!(resolved.did_expire);
        assert!(m.did_expire());
    }

    #[test]
    fn test_expired_tie_waits_for_next_vote() {
        let weights = electorate(10);
        let rules = VotingRules {
            expiration: Some(Duration::from_millis(HOUR)),
            majority_reached_ends: false,
        };
        let ctx = VotingContext::new(&weights, rules, 2 * HOUR);
        let mut m = motion(Majority::SIMPLE);

        m.cast_vote(vote("1", VoteState::For), &ctx);
        let outcome = m.cast_vote(vote("2", VoteState::Against), &ctx);
        assert!(outcome.resolved.is_none());
        assert!(m.check_resolution(&ctx).is_none());

        let outcome = m.cast_vote(vote("3", VoteState::Against), &ctx);
        assert_eq!(outcome.resolved.unwrap().resolution, MotionResolution::Failed);
    }

    #[test]
    fn test_zero_weight_electorate() {
        let weights = electorate(0);
        let ctx = VotingContext::new(&weights, VotingRules::default(), 0);
        let mut m = motion(Majority::SIMPLE);

        let outcome = m.cast_vote(vote("9", VoteState::Against), &ctx);
        assert!(outcome.resolved.is_some());
    }

    #[test]
    fn test_resolve_twice_fails() {
        let weights = electorate(3);
        let ctx = VotingContext::new(&weights, VotingRules::default(), 0);
        let mut m = motion(Majority::SIMPLE);

        let resolved = m.resolve(MotionResolution::Killed, &ctx).unwrap();
        assert_eq!(resolved.resolution, MotionResolution::Killed);

        for requested in [
            MotionResolution::Killed,
            MotionResolution::Passed,
            MotionResolution::Failed,
        ] {
            let err = m.resolve(requested, &ctx).unwrap_err();
            assert!(matches!(err, DomainError::InvalidState { motion: 1, .. }));
        }
        assert_eq!(m.resolution(), MotionResolution::Killed);
    }

    #[test]
    fn test_resolve_to_unresolved_rejected() {
        let weights = electorate(3);
        let ctx = VotingContext::new(&weights, VotingRules::default(), 0);
        let mut m = motion(Majority::SIMPLE);

        assert!(m.resolve(MotionResolution::Unresolved, &ctx).is_err());
        assert!(m.is_active());
    }

    #[test]
    fn test_resolved_record_is_frozen() {
        let weights = electorate(3);
        let ctx = VotingContext::new(&weights, VotingRules::default(), 0);
        let mut m = motion(Majority::SIMPLE);

        m.cast_vote(vote("1", VoteState::For), &ctx);
        m.resolve(MotionResolution::Killed, &ctx).unwrap();
        assert!(m.retract_vote(&"1".into()).is_none());
        assert_eq!(m.votes().len(), 1);
        assert!(m.check_resolution(&ctx).is_none());
    }

    #[test]
    fn test_remaining_voters() {
        let weights = electorate(3);
        let ctx = VotingContext::new(&weights, VotingRules::default(), 0);
        let mut m = motion(Majority::SIMPLE);

        m.cast_vote(vote("2", VoteState::For), &ctx);
        let mut remaining: Vec<_> = m.remaining_voters(&weights).into_iter().cloned().collect();
        remaining.sort();
        assert_eq!(remaining, vec![MemberId::from("1"), MemberId::from("3")]);
    }
}
