//! Council activity statistics

use crate::core::time::Timestamp;
use crate::membership::MemberId;
use serde::Serialize;

/// Activity of one member
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberActivity {
    pub id: MemberId,
    pub name: String,
    pub motions: usize,
    pub passed: usize,
    /// `None` means never
    pub last_motion: Option<Timestamp>,
    pub last_vote: Option<Timestamp>,
}

impl MemberActivity {
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            motions: 0,
            passed: 0,
            last_motion: None,
            last_vote: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CouncilStats {
    pub total_motions: usize,
    pub members: Vec<MemberActivity>,
}

impl CouncilStats {
    /// Members by number of motions proposed, most first
    pub fn most_motions(&self) -> Vec<&MemberActivity> {
        self.sorted_by(|a, b| b.motions.cmp(&a.motions))
    }

    /// Members by number of motions passed, most first
    pub fn most_passed(&self) -> Vec<&MemberActivity> {
        self.sorted_by(|a, b| b.passed.cmp(&a.passed))
    }

    /// Members by last vote, least recent first; never-voted members lead
    pub fn by_last_vote(&self) -> Vec<&MemberActivity> {
        self.sorted_by(|a, b| a.last_vote.cmp(&b.last_vote))
    }

    /// Members by last motion, least recent first; never-proposed members lead
    pub fn by_last_motion(&self) -> Vec<&MemberActivity> {
        self.sorted_by(|a, b| a.last_motion.cmp(&b.last_motion))
    }

    fn sorted_by<F>(&self, compare: F) -> Vec<&MemberActivity>
    where
        F: Fn(&MemberActivity, &MemberActivity) -> std::cmp::Ordering,
    {
        let mut members: Vec<&MemberActivity> = self.members.iter().collect();
        members.sort_by(|a, b| compare(a, b));
        members
    }
}
