//! Election use case
//!
//! Drives elections through their phases. Phase timers belong to the
//! caller: it invokes [`ElectionUseCase::close_candidacy`] and
//! [`ElectionUseCase::announce_results`] when the `ends_*_at` timestamps
//! pass. Finished elections leave the registry; later transitions aimed
//! at them are absorbed like any other out-of-phase call.

use crate::config::ElectionDefaults;
use crate::ports::clock::Clock;
use crate::ports::notification::{GovernanceEvent, GovernanceNotifier};
use crate::registry::{ElectionRegistry, SharedElection};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use votum_domain::{
    Candidate, CastVoteStatus, DomainError, Election, ElectionId, ElectionPhase, ElectionResults,
    MemberId, PhaseTransition, core::time::after,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElectionError {
    #[error("Election not found: {0}")]
    ElectionNotFound(String),

    #[error("{count} elections in {channel} fit a {phase} step, an election id is required")]
    AmbiguousElection {
        channel: String,
        phase: ElectionPhase,
        count: usize,
    },

    #[error("Phase durations must be positive")]
    InvalidDuration,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// How a caller points at an election
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElectionRef {
    Id(ElectionId),
    /// The one election in this channel in the phase the operation needs
    Channel(String),
}

impl From<ElectionId> for ElectionRef {
    fn from(id: ElectionId) -> Self {
        ElectionRef::Id(id)
    }
}

impl std::fmt::Display for ElectionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElectionRef::Id(id) => write!(f, "{}", id),
            ElectionRef::Channel(channel) => write!(f, "#{}", channel),
        }
    }
}

pub struct ElectionUseCase {
    elections: Arc<ElectionRegistry>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn GovernanceNotifier>,
    defaults: ElectionDefaults,
}

impl ElectionUseCase {
    pub fn new(
        elections: Arc<ElectionRegistry>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn GovernanceNotifier>,
        defaults: ElectionDefaults,
    ) -> Self {
        Self {
            elections,
            clock,
            notifier,
            defaults,
        }
    }

    /// Open an election in `channel`
    pub async fn open(
        &self,
        reason: &str,
        channel: &str,
        candidacy: Option<Duration>,
    ) -> Result<ElectionId, ElectionError> {
        let candidacy = candidacy.unwrap_or(self.defaults.candidacy);
        if candidacy.is_zero() {
            return Err(ElectionError::InvalidDuration);
        }

        let ends_candidacy_at = after(self.clock.now(), candidacy);
        let (id, _) = self.elections.open(reason, channel, ends_candidacy_at);

        info!("Election {} opened in {}: {}", id, channel, reason);
        self.notifier.notify(&GovernanceEvent::ElectionOpened {
            election: id.clone(),
            reason: reason.to_string(),
            channel: channel.to_string(),
            ends_candidacy_at,
        });
        Ok(id)
    }

    /// Register a candidate; `false` when already registered
    pub async fn register_candidate(
        &self,
        election: &ElectionRef,
        candidate: Candidate,
    ) -> Result<bool, ElectionError> {
        let (id, shared) = match self.resolve(election, ElectionPhase::Candidacy).await? {
            Lookup::Running(id, shared) => (id, shared),
            Lookup::Retired(id) => {
                debug!("Election {} already finished, {} cannot run", id, candidate.name);
                return Err(DomainError::Phase {
                    operation: "add_candidate",
                    phase: ElectionPhase::Finished,
                }
                .into());
            }
        };
        let added = shared.lock().await.add_candidate(candidate.clone())?;

        if added {
            info!("{} runs in {}", candidate.name, id);
            self.notifier.notify(&GovernanceEvent::CandidateRegistered {
                election: id,
                candidate,
            });
        } else {
            debug!("{} already runs in {}", candidate.name, id);
        }
        Ok(added)
    }

    /// End the candidacy phase
    ///
    /// `None` when the election had already left it.
    pub async fn close_candidacy(
        &self,
        election: &ElectionRef,
        voting: Option<Duration>,
    ) -> Result<Option<PhaseTransition>, ElectionError> {
        let voting = voting.unwrap_or(self.defaults.voting);
        if voting.is_zero() {
            return Err(ElectionError::InvalidDuration);
        }

        let Some((id, shared)) = self
            .resolve(election, ElectionPhase::Candidacy)
            .await?
            .running()
        else {
            return Ok(None);
        };
        let now = self.clock.now();
        let (transition, candidates) = {
            let mut election = shared.lock().await;
            let transition = election.close_candidacy(now, voting);
            (transition, election.candidates().to_vec())
        };

        match &transition {
            Some(PhaseTransition::VotingOpened { ends_at }) => {
                info!("Election {} voting opened with {} candidates", id, candidates.len());
                self.notifier.notify(&GovernanceEvent::ElectionVotingOpened {
                    election: id,
                    candidates,
                    ends_at: *ends_at,
                });
            }
            Some(PhaseTransition::Finished(results)) => {
                info!("Election {} finished without candidates", id);
                self.finish(&id, Some(results.clone())).await;
            }
            None => debug!("Election {} already left the candidacy phase", id),
        }
        Ok(transition)
    }

    /// Record a ballot; `None` when it was ignored
    pub async fn cast_ballot(
        &self,
        election: &ElectionRef,
        author: &MemberId,
        marker: usize,
    ) -> Result<Option<CastVoteStatus>, ElectionError> {
        let Some((id, shared)) = self
            .resolve(election, ElectionPhase::Voting)
            .await?
            .running()
        else {
            return Ok(None);
        };
        let status = shared.lock().await.cast_vote(author, marker);

        match status {
            Some(status) => {
                debug!("Ballot by {} in {} ({})", author, id, status);
                self.notifier.notify(&GovernanceEvent::BallotCast {
                    election: id,
                    author: author.clone(),
                    status,
                });
            }
            None => debug!("Ballot by {} in {} ignored (marker {})", author, id, marker),
        }
        Ok(status)
    }

    /// Close the ballot and publish the ranking
    pub async fn announce_results(
        &self,
        election: &ElectionRef,
    ) -> Result<Option<ElectionResults>, ElectionError> {
        let Some((id, shared)) = self
            .resolve(election, ElectionPhase::Voting)
            .await?
            .running()
        else {
            return Ok(None);
        };
        let results = shared.lock().await.announce_results();

        match &results {
            Some(results) => {
                info!("Election {} finished with {} ballots", id, results.ballots);
                self.finish(&id, Some(results.clone())).await;
            }
            None => debug!("Election {} is not voting, nothing to announce", id),
        }
        Ok(results)
    }

    /// Stop an election without results; `false` when it already finished
    pub async fn cancel(&self, id: &ElectionId) -> Result<bool, ElectionError> {
        if self.elections.is_retired(id) {
            debug!("Election {} already finished, nothing to cancel", id);
            return Ok(false);
        }
        let shared = self.get(id)?;
        let cancelled = shared.lock().await.cancel();

        if cancelled {
            warn!("Election {} cancelled", id);
            self.finish(id, None).await;
        }
        Ok(cancelled)
    }

    /// Copy of a running election's current state
    pub async fn snapshot(&self, id: &ElectionId) -> Result<Election, ElectionError> {
        let shared = self.get(id)?;
        let election = shared.lock().await;
        Ok(election.clone())
    }

    /// Copies of all running elections
    pub async fn running(&self) -> Vec<Election> {
        let mut running = Vec::new();
        for (_, shared) in self.elections.all() {
            running.push(shared.lock().await.clone());
        }
        running
    }

    fn get(&self, id: &ElectionId) -> Result<SharedElection, ElectionError> {
        self.elections
            .get(id)
            .ok_or_else(|| ElectionError::ElectionNotFound(id.to_string()))
    }

    /// Find the election an operation needing `phase` is aimed at
    ///
    /// A channel reference prefers the one election in `phase`, then the one
    /// running election of the channel, then the channel's last finished one.
    async fn resolve(
        &self,
        election: &ElectionRef,
        phase: ElectionPhase,
    ) -> Result<Lookup, ElectionError> {
        let id = match election {
            ElectionRef::Id(id) => id.clone(),
            ElectionRef::Channel(channel) => {
                let mut found = self.elections.find_in_channel(channel, phase).await;
                if found.is_empty() {
                    found = self.elections.running_in_channel(channel).await;
                }
                match found.as_slice() {
                    [id] => id.clone(),
                    [] => {
                        return self
                            .elections
                            .last_retired_in(channel)
                            .map(Lookup::Retired)
                            .ok_or_else(|| ElectionError::ElectionNotFound(election.to_string()));
                    }
                    many => {
                        return Err(ElectionError::AmbiguousElection {
                            channel: channel.clone(),
                            phase,
                            count: many.len(),
                        });
                    }
                }
            }
        };

        match self.elections.get(&id) {
            Some(shared) => Ok(Lookup::Running(id, shared)),
            None if self.elections.is_retired(&id) => {
                debug!("Election {} already finished", id);
                Ok(Lookup::Retired(id))
            }
            None => Err(ElectionError::ElectionNotFound(id.to_string())),
        }
    }

    async fn finish(&self, id: &ElectionId, results: Option<ElectionResults>) {
        self.elections.retire(id).await;
        self.notifier.notify(&GovernanceEvent::ElectionFinished {
            election: id.clone(),
            results,
        });
    }
}

/// Outcome of looking an election up
enum Lookup {
    Running(ElectionId, SharedElection),
    /// Finished earlier; phase transitions on it are no-ops
    Retired(ElectionId),
}

impl Lookup {
    fn running(self) -> Option<(ElectionId, SharedElection)> {
        match self {
            Lookup::Running(id, shared) => Some((id, shared)),
            Lookup::Retired(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::ManualClock;
    use crate::ports::notification::testing::RecordingNotifier;

    const MINUTE: Duration = Duration::from_secs(60);

    fn use_case() -> (ElectionUseCase, Arc<RecordingNotifier>) {
        let events = Arc::new(RecordingNotifier::default());
        let use_case = ElectionUseCase::new(
            Arc::new(ElectionRegistry::new()),
            Arc::new(ManualClock::new(0)),
            events.clone(),
            ElectionDefaults::default(),
        );
        (use_case, events)
    }

    fn channel() -> ElectionRef {
        ElectionRef::Channel("general".to_string())
    }

    #[tokio::test]
    async fn test_full_election() {
        let (uc, events) = use_case();
        let id = uc.open("Moderator", "general", Some(10 * MINUTE)).await.unwrap();
        assert_eq!(uc.snapshot(&id).await.unwrap().ends_candidacy_at(), 600_000);

        assert!(uc
            .register_candidate(&channel(), Candidate::new("a", "Alice", "experience"))
            .await
            .unwrap());
        assert!(uc
            .register_candidate(&channel(), Candidate::new("b", "Bob", ""))
            .await
            .unwrap());
        assert!(!uc
            .register_candidate(&channel(), Candidate::new("a", "Alice", "again"))
            .await
            .unwrap());

        let transition = uc.close_candidacy(&channel(), Some(5 * MINUTE)).await.unwrap();
        assert_eq!(transition, Some(PhaseTransition::VotingOpened { ends_at: 300_000 }));

        uc.cast_ballot(&channel(), &"v1".into(), 2).await.unwrap();
        uc.cast_ballot(&channel(), &"v2".into(), 2).await.unwrap();
        assert_eq!(uc.cast_ballot(&channel(), &"v3".into(), 9).await.unwrap(), None);

        let results = uc.announce_results(&id.clone().into()).await.unwrap().unwrap();
        assert_eq!(results.winners()[0].name, "Bob");
        assert!(matches!(
            uc.snapshot(&id).await,
            Err(ElectionError::ElectionNotFound(_))
        ));

        assert_eq!(
            events.types(),
            vec![
                "election_opened",
                "candidate_registered",
                "candidate_registered",
                "election_voting_opened",
                "ballot_cast",
                "ballot_cast",
                "election_finished"
            ]
        );
    }

    #[tokio::test]
    async fn test_no_candidates_finishes_immediately() {
        let (uc, events) = use_case();
        let id = uc.open("Treasurer", "general", None).await.unwrap();

        let transition = uc.close_candidacy(&id.clone().into(), None).await.unwrap();
        assert!(matches!(transition, Some(PhaseTransition::Finished(r)) if r.is_empty()));
        assert_eq!(events.types().last(), Some(&"election_finished"));
        assert!(uc.running().await.is_empty());
    }

    #[tokio::test]
    async fn test_late_candidate_is_a_phase_error() {
        let (uc, _) = use_case();
        let id = uc.open("Moderator", "general", None).await.unwrap();
        let by_id = ElectionRef::Id(id);
        uc.register_candidate(&by_id, Candidate::new("a", "Alice", ""))
            .await
            .unwrap();
        uc.close_candidacy(&by_id, None).await.unwrap();

        let err = uc
            .register_candidate(&by_id, Candidate::new("b", "Bob", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, ElectionError::Domain(DomainError::Phase { .. })));
    }

    #[tokio::test]
    async fn test_channel_lookup_errors() {
        let (uc, _) = use_case();
        assert!(matches!(
            uc.close_candidacy(&channel(), None).await,
            Err(ElectionError::ElectionNotFound(_))
        ));

        uc.open("A", "general", None).await.unwrap();
        uc.open("B", "general", None).await.unwrap();
        assert!(matches!(
            uc.close_candidacy(&channel(), None).await,
            Err(ElectionError::AmbiguousElection { count: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_duration_rejected() {
        let (uc, _) = use_case();
        assert_eq!(
            uc.open("A", "general", Some(Duration::ZERO)).await,
            Err(ElectionError::InvalidDuration)
        );
    }

    #[tokio::test]
    async fn test_cancel() {
        let (uc, events) = use_case();
        let id = uc.open("A", "general", None).await.unwrap();
        assert!(uc.cancel(&id).await.unwrap());
        assert!(!uc.cancel(&id).await.unwrap());
        assert!(matches!(
            uc.cancel(&ElectionId::from("election-9")).await,
            Err(ElectionError::ElectionNotFound(_))
        ));
        assert_eq!(events.types(), vec!["election_opened", "election_finished"]);
    }

    #[tokio::test]
    async fn test_calls_after_finish_are_absorbed() {
        let (uc, events) = use_case();
        let id = uc.open("Moderator", "general", None).await.unwrap();
        let by_id = ElectionRef::Id(id.clone());
        uc.register_candidate(&by_id, Candidate::new("a", "Alice", ""))
            .await
            .unwrap();
        uc.close_candidacy(&by_id, None).await.unwrap();
        uc.cast_ballot(&by_id, &"v1".into(), 1).await.unwrap();
        assert!(uc.announce_results(&by_id).await.unwrap().is_some());

        assert_eq!(uc.announce_results(&by_id).await.unwrap(), None);
        assert_eq!(uc.cast_ballot(&by_id, &"v2".into(), 1).await.unwrap(), None);
        assert_eq!(uc.close_candidacy(&by_id, None).await.unwrap(), None);
        assert_eq!(uc.announce_results(&channel()).await.unwrap(), None);
        assert_eq!(uc.cast_ballot(&channel(), &"v3".into(), 1).await.unwrap(), None);

        let err = uc
            .register_candidate(&by_id, Candidate::new("b", "Bob", ""))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ElectionError::Domain(DomainError::Phase {
                phase: ElectionPhase::Finished,
                ..
            })
        ));

        let finished = events
            .types()
            .iter()
            .filter(|t| **t == "election_finished")
            .count();
        assert_eq!(finished, 1);
    }

    #[tokio::test]
    async fn test_channel_lookup_falls_back_to_running_election() {
        let (uc, _) = use_case();
        uc.open("Moderator", "general", None).await.unwrap();

        // Still in candidacy: the ballot reaches the election and is ignored
        assert_eq!(uc.cast_ballot(&channel(), &"v1".into(), 1).await.unwrap(), None);
        assert_eq!(uc.announce_results(&channel()).await.unwrap(), None);
        assert_eq!(uc.running().await.len(), 1);
    }
}
