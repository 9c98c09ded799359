//! Port for finish actions.
//!
//! A council may chain follow-ups to a resolution, such as forwarding the
//! motion text to another council. The use case hands each selected
//! action to a [`FinishActionPort`] after the council lock is released.

use async_trait::async_trait;
use thiserror::Error;
use votum_domain::{CouncilId, FinishAction, MotionResolved};

/// One finish action to carry out
#[derive(Debug, Clone, PartialEq)]
pub struct FinishActionRequest {
    /// Council the motion belongs to
    pub source: CouncilId,
    pub motion: MotionResolved,
    pub action: FinishAction,
}

/// What a finish action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishActionOutcome {
    /// A new motion was proposed in `council`
    Forwarded { council: CouncilId, motion: u32 },
    /// Nothing was done
    Skipped,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FinishActionError {
    #[error("Finish action target council not found: {0}")]
    TargetNotFound(String),

    #[error("Forwarded motion rejected by {council}: {reason}")]
    Rejected { council: String, reason: String },
}

#[async_trait]
pub trait FinishActionPort: Send + Sync {
    async fn perform(
        &self,
        request: FinishActionRequest,
    ) -> Result<FinishActionOutcome, FinishActionError>;
}

/// Skips every action; for tests and single-council setups.
pub struct NoFinishActions;

#[async_trait]
impl FinishActionPort for NoFinishActions {
    async fn perform(
        &self,
        _request: FinishActionRequest,
    ) -> Result<FinishActionOutcome, FinishActionError> {
        Ok(FinishActionOutcome::Skipped)
    }
}
