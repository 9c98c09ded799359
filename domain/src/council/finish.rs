//! Finish actions: follow-ups chained to a motion's resolution

use crate::motion::{Majority, MotionResolution};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishActionKind {
    /// Propose the motion's text again in another council
    Forward,
}

/// One configured follow-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishAction {
    pub action: FinishActionKind,
    /// Target council id
    pub to: String,
    /// Option string prepended to the forwarded text (e.g. "-u")
    #[serde(default)]
    pub options: Option<String>,
    /// Only run for motions with this majority (within 0.01)
    #[serde(default)]
    pub at_majority: Option<f64>,
}

impl FinishAction {
    pub fn forward(to: impl Into<String>) -> Self {
        Self {
            action: FinishActionKind::Forward,
            to: to.into(),
            options: None,
            at_majority: None,
        }
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    pub fn at_majority(mut self, majority: f64) -> Self {
        self.at_majority = Some(majority);
        self
    }

    pub fn applies_to(&self, majority: Majority) -> bool {
        self.at_majority.is_none_or(|m| majority.approx_eq(m))
    }
}

/// Finish actions per resolution kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinishActions {
    #[serde(default)]
    pub passed: Vec<FinishAction>,
    #[serde(default)]
    pub failed: Vec<FinishAction>,
    #[serde(default)]
    pub killed: Vec<FinishAction>,
}

impl FinishActions {
    pub fn is_empty(&self) -> bool {
        self.passed.is_empty() && self.failed.is_empty() && self.killed.is_empty()
    }

    pub fn all(&self) -> impl Iterator<Item = &FinishAction> {
        self.passed.iter().chain(&self.failed).chain(&self.killed)
    }

    /// Actions to run for a motion that ended with `resolution`
    pub fn select(&self, resolution: MotionResolution, majority: Majority) -> Vec<FinishAction> {
        let actions = match resolution {
            MotionResolution::Passed => &self.passed,
            MotionResolution::Failed => &self.failed,
            MotionResolution::Killed => &self.killed,
            MotionResolution::Unresolved => return Vec::new(),
        };
        actions
            .iter()
            .filter(|a| a.applies_to(majority))
            .cloned()
            .collect()
    }
}
