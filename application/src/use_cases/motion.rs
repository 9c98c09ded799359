//! Motion use case
//!
//! Applies member input to a council under the council's lock, then
//! publishes notifications and runs finish actions once the lock is gone.

use crate::ports::clock::Clock;
use crate::ports::finish_action::{FinishActionPort, FinishActionRequest};
use crate::ports::notification::{GovernanceEvent, GovernanceNotifier};
use crate::registry::{CouncilRegistry, SharedCouncil};
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use votum_domain::{
    Ballot, CastVoteStatus, Council, CouncilId, DomainError, MemberId, Motion, ResolutionReport,
    Vote, VoteReceipt,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    #[error("Council not found: {0}")]
    CouncilNotFound(CouncilId),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl MotionError {
    /// Expected user-input rejection, as opposed to caller misuse
    pub fn is_validation(&self) -> bool {
        matches!(self, MotionError::Domain(e) if e.is_validation())
    }
}

/// Use case for everything that happens to motions
pub struct MotionUseCase {
    councils: Arc<CouncilRegistry>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn GovernanceNotifier>,
    finish_actions: Arc<dyn FinishActionPort>,
}

impl MotionUseCase {
    pub fn new(
        councils: Arc<CouncilRegistry>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn GovernanceNotifier>,
        finish_actions: Arc<dyn FinishActionPort>,
    ) -> Self {
        Self {
            councils,
            clock,
            notifier,
            finish_actions,
        }
    }

    /// Propose a motion on behalf of a roster member
    pub async fn propose(
        &self,
        council_id: &CouncilId,
        author: &MemberId,
        input: &str,
    ) -> Result<Motion, MotionError> {
        let now = self.clock.now();
        let motion = {
            let mut council = self.council(council_id)?.lock_owned().await;
            council.propose(author, input, now)?.clone()
        };

        info!(
            "Motion #{} proposed in {} by {}",
            motion.number(),
            council_id,
            motion.author_name()
        );
        self.notifier.notify(&proposed(council_id, &motion));
        Ok(motion)
    }

    /// Cast a vote; `number` may be omitted when one motion is active
    pub async fn cast_vote(
        &self,
        council_id: &CouncilId,
        number: Option<u32>,
        ballot: Ballot,
    ) -> Result<VoteReceipt, MotionError> {
        let now = self.clock.now();
        let author = ballot.author_id.clone();
        let author_name = ballot.author_name.clone();
        let state = ballot.state;

        let (receipt, tally) = {
            let mut council = self.council(council_id)?.lock_owned().await;
            let receipt = council.cast_vote(number, ballot, now)?;
            let weights = council.weights();
            let tally = council
                .motion(receipt.motion)
                .map(|m| m.tally(&weights))
                .unwrap_or_default();
            (receipt, tally)
        };

        if receipt.status == CastVoteStatus::Failed {
            debug!(
                "Vote by {} on resolved motion #{} absorbed",
                author, receipt.motion
            );
            return Ok(receipt);
        }

        info!(
            "Vote on motion #{} in {}: {} {} ({})",
            receipt.motion, council_id, author_name, state, receipt.status
        );
        self.notifier.notify(&GovernanceEvent::VoteCast {
            council: council_id.clone(),
            motion: receipt.motion,
            author,
            author_name,
            state,
            status: receipt.status,
            tally,
        });

        if let Some(report) = &receipt.resolution {
            self.settle(council_id, report.clone()).await;
        }
        Ok(receipt)
    }

    /// Withdraw a vote
    pub async fn retract_vote(
        &self,
        council_id: &CouncilId,
        number: Option<u32>,
        author: &MemberId,
    ) -> Result<Option<Vote>, MotionError> {
        let (number, retracted) = {
            let mut council = self.council(council_id)?.lock_owned().await;
            let number = council.target_motion(number)?;
            (number, council.retract_vote(Some(number), author)?)
        };

        match &retracted {
            Some(_) => {
                info!("Vote by {} on motion #{} retracted", author, number);
                self.notifier.notify(&GovernanceEvent::VoteRetracted {
                    council: council_id.clone(),
                    motion: number,
                    author: author.clone(),
                });
            }
            None => debug!("No vote by {} on motion #{} to retract", author, number),
        }
        Ok(retracted)
    }

    /// Kill a motion
    pub async fn kill(
        &self,
        council_id: &CouncilId,
        number: Option<u32>,
    ) -> Result<ResolutionReport, MotionError> {
        let now = self.clock.now();
        let report = {
            let mut council = self.council(council_id)?.lock_owned().await;
            council.kill(number, now).inspect_err(|e| {
                if !e.is_validation() {
                    warn!("Kill rejected in {}: {}", council_id, e);
                }
            })?
        };

        self.settle(council_id, report.clone()).await;
        Ok(report)
    }

    /// Resolve the expired motions of one council
    pub async fn sweep(
        &self,
        council_id: &CouncilId,
    ) -> Result<Vec<ResolutionReport>, MotionError> {
        let now = self.clock.now();
        let reports = {
            let mut council = self.council(council_id)?.lock_owned().await;
            council.sweep(now)
        };

        for report in &reports {
            self.settle(council_id, report.clone()).await;
        }
        Ok(reports)
    }

    /// Resolve the expired motions of every council
    pub async fn sweep_all(&self) -> Vec<ResolutionReport> {
        let mut reports = Vec::new();
        for id in self.councils.ids() {
            match self.sweep(&id).await {
                Ok(mut r) => reports.append(&mut r),
                Err(e) => warn!("Sweep of {} failed: {}", id, e),
            }
        }
        reports
    }

    /// Set the weight of a member or role
    pub async fn set_weight(
        &self,
        council_id: &CouncilId,
        target: &str,
        weight: f64,
    ) -> Result<f64, MotionError> {
        let mut council = self.council(council_id)?.lock_owned().await;
        council.set_weight(target, weight)?;
        let total = council.weights().total();
        info!(
            "Weight of {} in {} set to {} (total {})",
            target, council_id, weight, total
        );
        Ok(total)
    }

    /// Copy of a council's current state
    pub async fn snapshot(&self, council_id: &CouncilId) -> Result<Council, MotionError> {
        let council = self.council(council_id)?.lock_owned().await;
        Ok((*council).clone())
    }

    fn council(&self, id: &CouncilId) -> Result<SharedCouncil, MotionError> {
        self.councils
            .get(id)
            .ok_or_else(|| MotionError::CouncilNotFound(id.clone()))
    }

    /// Publish a resolution and run its finish actions
    async fn settle(&self, council_id: &CouncilId, report: ResolutionReport) {
        info!(
            "Motion #{} in {} resolved: {}",
            report.motion.motion, council_id, report.motion.resolution
        );
        self.notifier.notify(&GovernanceEvent::MotionResolved {
            council: council_id.clone(),
            report: report.clone(),
        });

        if report.finish_actions.is_empty() {
            return;
        }

        let requests = report
            .finish_actions
            .into_iter()
            .map(|action| FinishActionRequest {
                source: council_id.clone(),
                motion: report.motion.clone(),
                action,
            });
        let outcomes = join_all(requests.map(|r| self.finish_actions.perform(r))).await;

        for outcome in outcomes {
            match outcome {
                Ok(outcome) => debug!("Finish action done: {:?}", outcome),
                Err(e) => warn!("Finish action failed: {}", e),
            }
        }
    }
}

/// Event published for a newly proposed motion
pub(crate) fn proposed(council_id: &CouncilId, motion: &Motion) -> GovernanceEvent {
    GovernanceEvent::MotionProposed {
        council: council_id.clone(),
        motion: motion.number(),
        author: motion.author_id().clone(),
        author_name: motion.author_name().to_string(),
        text: motion.text().to_string(),
        majority: motion.required_majority(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::ManualClock;
    use crate::ports::finish_action::NoFinishActions;
    use crate::ports::notification::testing::RecordingNotifier;
    use std::time::Duration;
    use votum_domain::{CouncilConfig, Member, MotionResolution, ValidationError, VoteState};

    struct Fixture {
        use_case: MotionUseCase,
        clock: Arc<ManualClock>,
        events: Arc<RecordingNotifier>,
        id: CouncilId,
    }

    fn fixture(config: CouncilConfig) -> Fixture {
        let councils = Arc::new(CouncilRegistry::new());
        let roster = (1..=3)
            .map(|i| Member::new(i.to_string(), format!("m{}", i)))
            .collect();
        councils.insert(Council::new("general", "General", config).with_roster(roster));

        let clock = Arc::new(ManualClock::new(0));
        let events = Arc::new(RecordingNotifier::default());
        let use_case = MotionUseCase::new(
            councils,
            clock.clone(),
            events.clone(),
            Arc::new(NoFinishActions),
        );
        Fixture {
            use_case,
            clock,
            events,
            id: CouncilId::new("general"),
        }
    }

    fn ballot(author: &str, state: VoteState) -> Ballot {
        Ballot::new(author, format!("m{}", author), state)
    }

    #[tokio::test]
    async fn test_vote_flow_notifies_each_step() {
        let f = fixture(CouncilConfig {
            majority_reached_ends: true,
            ..Default::default()
        });
        f.use_case
            .propose(&f.id, &"1".into(), "Adopt the charter")
            .await
            .unwrap();
        f.use_case
            .cast_vote(&f.id, None, ballot("1", VoteState::For))
            .await
            .unwrap();
        let receipt = f
            .use_case
            .cast_vote(&f.id, None, ballot("2", VoteState::For))
            .await
            .unwrap();

        assert_eq!(
            receipt.resolution.unwrap().motion.resolution,
            MotionResolution::Passed
        );
        assert_eq!(
            f.events.types(),
            vec!["motion_proposed", "vote_cast", "vote_cast", "motion_resolved"]
        );
    }

    #[tokio::test]
    async fn test_absorbed_vote_is_not_notified() {
        let f = fixture(CouncilConfig::default());
        f.use_case.propose(&f.id, &"1".into(), "A").await.unwrap();
        f.use_case.kill(&f.id, None).await.unwrap();

        let receipt = f
            .use_case
            .cast_vote(&f.id, Some(1), ballot("2", VoteState::For))
            .await
            .unwrap();
        assert_eq!(receipt.status, CastVoteStatus::Failed);
        assert_eq!(f.events.types(), vec!["motion_proposed", "motion_resolved"]);
    }

    #[tokio::test]
    async fn test_validation_errors_leave_state_untouched() {
        let f = fixture(CouncilConfig::default());
        let err = f
            .use_case
            .propose(&f.id, &"1".into(), "--majority 0% Text")
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(
            err,
            MotionError::Domain(DomainError::Validation(
                ValidationError::MajorityOutOfRange(_)
            ))
        ));
        assert!(f.events.events().is_empty());
        assert!(f.use_case.snapshot(&f.id).await.unwrap().motions().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_council() {
        let f = fixture(CouncilConfig::default());
        let err = f
            .use_case
            .propose(&CouncilId::new("nowhere"), &"1".into(), "A")
            .await
            .unwrap_err();
        assert_eq!(err, MotionError::CouncilNotFound(CouncilId::new("nowhere")));
    }

    #[tokio::test]
    async fn test_retract_notifies_only_when_removed() {
        let f = fixture(CouncilConfig::default());
        f.use_case.propose(&f.id, &"1".into(), "A").await.unwrap();
        f.use_case
            .cast_vote(&f.id, None, ballot("2", VoteState::Against))
            .await
            .unwrap();

        assert!(f
            .use_case
            .retract_vote(&f.id, None, &"2".into())
            .await
            .unwrap()
            .is_some());
        assert!(f
            .use_case
            .retract_vote(&f.id, None, &"2".into())
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            f.events.types(),
            vec!["motion_proposed", "vote_cast", "vote_retracted"]
        );
    }

    #[tokio::test]
    async fn test_sweep_uses_clock() {
        let f = fixture(CouncilConfig {
            motion_expiration: Some(Duration::from_secs(3600)),
            ..Default::default()
        });
        f.use_case.propose(&f.id, &"1".into(), "A").await.unwrap();
        f.use_case
            .cast_vote(&f.id, None, ballot("2", VoteState::Against))
            .await
            .unwrap();

        assert!(f.use_case.sweep(&f.id).await.unwrap().is_empty());
        f.clock.advance(Duration::from_secs(3601));

        let reports = f.use_case.sweep_all().await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].motion.resolution, MotionResolution::Failed);
        assert!(reports[0].motion.did_expire);
    }

    #[tokio::test]
    async fn test_set_weight_reports_total() {
        let f = fixture(CouncilConfig::default());
        assert_eq!(f.use_case.set_weight(&f.id, "1", 4.0).await.unwrap(), 6.0);
        assert!(f.use_case.set_weight(&f.id, "1", -1.0).await.is_err());
    }
}
