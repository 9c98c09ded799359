//! What a resolution asks the outside world to do

use super::finish::FinishAction;
use crate::motion::MotionResolved;
use serde::Serialize;

/// Side effect requested by a resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum ResolutionEffect {
    /// Post the resolved motion to a channel
    Announce { channel: String },
    /// Tear down the motion's deliberation room
    CloseDeliberation { archive_transcript: bool },
}

/// A resolved motion with everything the caller must carry out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionReport {
    pub motion: MotionResolved,
    pub effects: Vec<ResolutionEffect>,
    pub finish_actions: Vec<FinishAction>,
}

impl ResolutionReport {
    pub fn announcements(&self) -> impl Iterator<Item = &str> {
        self.effects.iter().filter_map(|e| match e {
            ResolutionEffect::Announce { channel } => Some(channel.as_str()),
            _ => None,
        })
    }
}
