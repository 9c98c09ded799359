//! Forward finish action
//!
//! Re-proposes a resolved motion's text in another council of the same
//! registry, with the action's options prepended.

use super::motion::proposed;
use crate::ports::clock::Clock;
use crate::ports::finish_action::{
    FinishActionError, FinishActionOutcome, FinishActionPort, FinishActionRequest,
};
use crate::ports::notification::GovernanceNotifier;
use crate::registry::CouncilRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use votum_domain::CouncilId;

pub struct RegistryForwarder {
    councils: Arc<CouncilRegistry>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn GovernanceNotifier>,
}

impl RegistryForwarder {
    pub fn new(
        councils: Arc<CouncilRegistry>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn GovernanceNotifier>,
    ) -> Self {
        Self {
            councils,
            clock,
            notifier,
        }
    }
}

#[async_trait]
impl FinishActionPort for RegistryForwarder {
    async fn perform(
        &self,
        request: FinishActionRequest,
    ) -> Result<FinishActionOutcome, FinishActionError> {
        let target = CouncilId::new(request.action.to.as_str());
        let shared = self
            .councils
            .get(&target)
            .ok_or_else(|| FinishActionError::TargetNotFound(request.action.to.clone()))?;

        let input = match &request.action.options {
            Some(options) => format!("{} {}", options, request.motion.text),
            None => request.motion.text.clone(),
        };

        let now = self.clock.now();
        let motion = {
            let mut council = shared.lock_owned().await;
            council
                .propose_as(
                    request.motion.author_id.clone(),
                    request.motion.author_name.clone(),
                    &input,
                    now,
                )
                .map_err(|e| FinishActionError::Rejected {
                    council: target.to_string(),
                    reason: e.to_string(),
                })?
                .clone()
        };

        info!(
            "Motion #{} of {} forwarded to {} as #{}",
            request.motion.motion,
            request.source,
            target,
            motion.number()
        );
        self.notifier.notify(&proposed(&target, &motion));

        Ok(FinishActionOutcome::Forwarded {
            council: target,
            motion: motion.number(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::ManualClock;
    use crate::ports::notification::testing::RecordingNotifier;
    use crate::use_cases::motion::MotionUseCase;
    use votum_domain::{
        Ballot, Council, CouncilConfig, FinishAction, FinishActions, Member, VoteState,
    };

    fn roster() -> Vec<Member> {
        vec![Member::new("1", "m1"), Member::new("2", "m2")]
    }

    #[tokio::test]
    async fn test_passed_motion_is_forwarded_with_options() {
        let councils = Arc::new(CouncilRegistry::new());
        councils.insert(
            Council::new(
                "assembly",
                "Assembly",
                CouncilConfig {
                    finish_actions: FinishActions {
                        passed: vec![FinishAction::forward("senate").with_options("-u")],
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .with_roster(roster()),
        );
        councils.insert(Council::new("senate", "Senate", CouncilConfig::default()));

        let clock = Arc::new(ManualClock::new(0));
        let events = Arc::new(RecordingNotifier::default());
        let forwarder = Arc::new(RegistryForwarder::new(
            councils.clone(),
            clock.clone(),
            events.clone(),
        ));
        let use_case = MotionUseCase::new(councils.clone(), clock, events.clone(), forwarder);

        let assembly = CouncilId::new("assembly");
        use_case
            .propose(&assembly, &"1".into(), "Build a bridge")
            .await
            .unwrap();
        for author in ["1", "2"] {
            use_case
                .cast_vote(&assembly, None, Ballot::new(author, author, VoteState::For))
                .await
                .unwrap();
        }

        let senate = use_case.snapshot(&CouncilId::new("senate")).await.unwrap();
        let forwarded = senate.motion(1).unwrap();
        assert_eq!(forwarded.text(), "Build a bridge");
        assert!(forwarded.required_majority().is_unanimous());
        assert_eq!(forwarded.author_name(), "m1");
        assert_eq!(events.types().last(), Some(&"motion_proposed"));
    }

    #[tokio::test]
    async fn test_unknown_target() {
        let councils = Arc::new(CouncilRegistry::new());
        let forwarder = RegistryForwarder::new(
            councils,
            Arc::new(ManualClock::new(0)),
            Arc::new(RecordingNotifier::default()),
        );
        let motion = votum_domain::MotionResolved {
            motion: 1,
            text: "Text".to_string(),
            author_id: "1".into(),
            author_name: "m1".to_string(),
            created_at: 0,
            resolution: votum_domain::MotionResolution::Passed,
            required_majority: votum_domain::Majority::SIMPLE,
            did_expire: false,
            tally: Default::default(),
        };
        let err = forwarder
            .perform(FinishActionRequest {
                source: CouncilId::new("assembly"),
                motion,
                action: FinishAction::forward("nowhere"),
            })
            .await
            .unwrap_err();
        assert_eq!(err, FinishActionError::TargetNotFound("nowhere".to_string()));
    }
}
