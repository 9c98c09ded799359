//! Port for governance notifications.
//!
//! Defines the [`GovernanceNotifier`] trait the use cases call once per
//! state-relevant event: a motion proposed, a vote cast, changed or
//! retracted, a motion resolved, an election phase change.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! diagnostic messages, while this port carries the events members see
//! (rendered by the presentation layer) and the structured event log.

use serde::Serialize;
use votum_domain::{
    CastVoteStatus, Candidate, CouncilId, ElectionId, ElectionResults, Majority, MemberId,
    ResolutionReport, Tally, Timestamp, VoteState,
};

/// A state-relevant event in a council or election.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GovernanceEvent {
    MotionProposed {
        council: CouncilId,
        motion: u32,
        author: MemberId,
        author_name: String,
        text: String,
        majority: Majority,
    },
    VoteCast {
        council: CouncilId,
        motion: u32,
        author: MemberId,
        author_name: String,
        state: VoteState,
        status: CastVoteStatus,
        tally: Tally,
    },
    VoteRetracted {
        council: CouncilId,
        motion: u32,
        author: MemberId,
    },
    MotionResolved {
        council: CouncilId,
        report: ResolutionReport,
    },
    ElectionOpened {
        election: ElectionId,
        reason: String,
        channel: String,
        ends_candidacy_at: Timestamp,
    },
    CandidateRegistered {
        election: ElectionId,
        candidate: Candidate,
    },
    ElectionVotingOpened {
        election: ElectionId,
        candidates: Vec<Candidate>,
        ends_at: Timestamp,
    },
    BallotCast {
        election: ElectionId,
        author: MemberId,
        status: CastVoteStatus,
    },
    /// `results` is `None` when the election was cancelled
    ElectionFinished {
        election: ElectionId,
        results: Option<ElectionResults>,
    },
}

impl GovernanceEvent {
    /// Event type identifier, as serialized in the `type` field.
    pub fn event_type(&self) -> &'static str {
        match self {
            GovernanceEvent::MotionProposed { .. } => "motion_proposed",
            GovernanceEvent::VoteCast { .. } => "vote_cast",
            GovernanceEvent::VoteRetracted { .. } => "vote_retracted",
            GovernanceEvent::MotionResolved { .. } => "motion_resolved",
            GovernanceEvent::ElectionOpened { .. } => "election_opened",
            GovernanceEvent::CandidateRegistered { .. } => "candidate_registered",
            GovernanceEvent::ElectionVotingOpened { .. } => "election_voting_opened",
            GovernanceEvent::BallotCast { .. } => "ballot_cast",
            GovernanceEvent::ElectionFinished { .. } => "election_finished",
        }
    }
}

/// Port for delivering governance events.
///
/// The `notify` method is intentionally synchronous and non-fallible:
/// it runs after the entity lock is released and a failing sink must not
/// undo a vote that was already recorded.
pub trait GovernanceNotifier: Send + Sync {
    fn notify(&self, event: &GovernanceEvent);
}

/// No-op implementation for tests and when nothing listens.
pub struct NoNotifications;

impl GovernanceNotifier for NoNotifications {
    fn notify(&self, _event: &GovernanceEvent) {}
}

/// A notifier that delegates to multiple inner notifiers.
///
/// ```text
/// MotionUseCase / ElectionUseCase
///               |
///     +---------+----------+
///     |                    |
/// ConsoleNotifier     JsonlEventLog
/// ```
#[derive(Default)]
pub struct CompositeNotifier {
    delegates: Vec<std::sync::Arc<dyn GovernanceNotifier>>,
}

impl CompositeNotifier {
    pub fn new(delegates: Vec<std::sync::Arc<dyn GovernanceNotifier>>) -> Self {
        Self { delegates }
    }

    pub fn push(&mut self, delegate: std::sync::Arc<dyn GovernanceNotifier>) {
        self.delegates.push(delegate);
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl GovernanceNotifier for CompositeNotifier {
    fn notify(&self, event: &GovernanceEvent) {
        for d in &self.delegates {
            d.notify(event);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every event for assertions.
    #[derive(Default)]
    pub struct RecordingNotifier {
        events: Mutex<Vec<GovernanceEvent>>,
    }

    impl RecordingNotifier {
        pub fn events(&self) -> Vec<GovernanceEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn types(&self) -> Vec<&'static str> {
            self.events().iter().map(|e| e.event_type()).collect()
        }
    }

    impl GovernanceNotifier for RecordingNotifier {
        fn notify(&self, event: &GovernanceEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }
}
