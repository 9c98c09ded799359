//! Applies replay script steps through the use cases

use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use votum_application::{Clock, ElectionRef, ElectionUseCase, ManualClock, MotionUseCase};
use votum_domain::{
    Ballot, Candidate, CouncilId, ElectionId, ElectionResults, Member, MemberId, VoteSource,
};
use votum_infrastructure::script::{ScriptLine, ScriptStep, minutes};

/// A step that could not be applied
#[derive(Debug)]
pub struct StepFailure {
    pub line: usize,
    pub step: &'static str,
    pub error: String,
}

/// What a replay did
#[derive(Debug, Default)]
pub struct ReplaySummary {
    pub applied: usize,
    pub failures: Vec<StepFailure>,
    /// Results of elections that finished during the replay
    pub results: Vec<ElectionResults>,
}

pub struct Replayer {
    motions: MotionUseCase,
    elections: ElectionUseCase,
    clock: Arc<ManualClock>,
    primary: CouncilId,
    names: HashMap<MemberId, String>,
}

impl Replayer {
    pub fn new(
        motions: MotionUseCase,
        elections: ElectionUseCase,
        clock: Arc<ManualClock>,
        primary: CouncilId,
        roster: &[Member],
    ) -> Self {
        let names = roster
            .iter()
            .map(|m| (m.id.clone(), m.name.clone()))
            .collect();
        Self {
            motions,
            elections,
            clock,
            primary,
            names,
        }
    }

    pub fn motions(&self) -> &MotionUseCase {
        &self.motions
    }

    pub fn elections(&self) -> &ElectionUseCase {
        &self.elections
    }

    pub fn now(&self) -> votum_domain::Timestamp {
        self.clock.now()
    }

    /// Apply every step in order; a failing step does not stop the replay
    pub async fn run(&self, lines: &[ScriptLine]) -> ReplaySummary {
        let mut summary = ReplaySummary::default();

        for line in lines {
            debug!("Line {}: {}", line.line, line.step.name());
            match self.apply(&line.step).await {
                Ok(finished) => {
                    summary.applied += 1;
                    summary.results.extend(finished);
                }
                Err(e) => {
                    warn!("Line {} ({}) failed: {}", line.line, line.step.name(), e);
                    summary.failures.push(StepFailure {
                        line: line.line,
                        step: line.step.name(),
                        error: e.to_string(),
                    });
                }
            }
        }

        summary
    }

    /// Apply one step, returning the results of any election it finished
    async fn apply(&self, step: &ScriptStep) -> Result<Option<ElectionResults>> {
        match step {
            ScriptStep::Propose {
                council,
                author,
                text,
            } => {
                self.motions
                    .propose(&self.council(council), &MemberId::from(author.as_str()), text)
                    .await?;
            }
            ScriptStep::Vote {
                council,
                motion,
                author,
                state,
                reason,
                command,
            } => {
                let author = MemberId::from(author.as_str());
                let mut ballot = Ballot::new(author.clone(), self.name_of(&author), *state);
                if let Some(reason) = reason {
                    ballot = ballot.with_reason(reason.as_str());
                }
                if *command {
                    ballot = ballot.via(VoteSource::Command);
                }
                self.motions
                    .cast_vote(&self.council(council), *motion, ballot)
                    .await?;
            }
            ScriptStep::Retract {
                council,
                motion,
                author,
            } => {
                self.motions
                    .retract_vote(&self.council(council), *motion, &MemberId::from(author.as_str()))
                    .await?;
            }
            ScriptStep::Kill { council, motion } => {
                self.motions.kill(&self.council(council), *motion).await?;
            }
            ScriptStep::Advance { minutes: value } => {
                let by = minutes(*value)
                    .ok_or_else(|| anyhow!("advance needs a positive number of minutes"))?;
                let now = self.clock.advance(by);
                debug!("Clock advanced to {}", now);
            }
            ScriptStep::Sweep { council } => match council {
                Some(id) => {
                    self.motions.sweep(&CouncilId::from(id.as_str())).await?;
                }
                None => {
                    self.motions.sweep_all().await;
                }
            },
            ScriptStep::SetWeight {
                council,
                target,
                weight,
            } => {
                self.motions
                    .set_weight(&self.council(council), target, *weight)
                    .await?;
            }
            ScriptStep::OpenElection {
                reason,
                channel,
                candidacy_minutes,
            } => {
                let candidacy = duration(*candidacy_minutes)?;
                self.elections.open(reason, channel, candidacy).await?;
            }
            ScriptStep::Candidate {
                election,
                channel,
                id,
                name,
                reason,
            } => {
                let target = election_ref(election, channel)?;
                let candidate = Candidate::new(id.as_str(), name.as_str(), reason.as_str());
                self.elections.register_candidate(&target, candidate).await?;
            }
            ScriptStep::CloseCandidacy {
                election,
                channel,
                voting_minutes,
            } => {
                let target = election_ref(election, channel)?;
                let voting = duration(*voting_minutes)?;
                let transition = self.elections.close_candidacy(&target, voting).await?;
                if let Some(votum_domain::PhaseTransition::Finished(results)) = transition {
                    return Ok(Some(results));
                }
            }
            ScriptStep::Ballot {
                election,
                channel,
                author,
                marker,
            } => {
                let target = election_ref(election, channel)?;
                self.elections
                    .cast_ballot(&target, &MemberId::from(author.as_str()), *marker)
                    .await?;
            }
            ScriptStep::Announce { election, channel } => {
                let target = election_ref(election, channel)?;
                return Ok(self.elections.announce_results(&target).await?);
            }
            ScriptStep::CancelElection { election } => {
                self.elections
                    .cancel(&ElectionId::from(election.as_str()))
                    .await?;
            }
        }
        Ok(None)
    }

    fn council(&self, id: &Option<String>) -> CouncilId {
        id.as_deref()
            .map(CouncilId::from)
            .unwrap_or_else(|| self.primary.clone())
    }

    fn name_of(&self, id: &MemberId) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }
}

fn election_ref(election: &Option<String>, channel: &Option<String>) -> Result<ElectionRef> {
    match (election, channel) {
        (Some(id), _) => Ok(ElectionRef::Id(ElectionId::from(id.as_str()))),
        (None, Some(channel)) => Ok(ElectionRef::Channel(channel.clone())),
        (None, None) => Err(anyhow!("an election id or a channel is required")),
    }
}

fn duration(value: Option<f64>) -> Result<Option<std::time::Duration>> {
    value
        .map(|m| minutes(m).ok_or_else(|| anyhow!("durations need a positive number of minutes")))
        .transpose()
}
