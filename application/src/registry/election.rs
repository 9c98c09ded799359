//! Election registry
//!
//! Running elections, each behind its own async mutex. Ids come from a
//! registry-wide sequence: `election-1`, `election-2`, ... Finished
//! elections are retired: the entity is dropped, but its id and channel are
//! remembered so late calls can be told apart from unknown ids.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use votum_domain::{Election, ElectionId, ElectionPhase, Timestamp};

pub type SharedElection = Arc<Mutex<Election>>;

#[derive(Default)]
pub struct ElectionRegistry {
    elections: RwLock<HashMap<ElectionId, SharedElection>>,
    /// Finished elections in retirement order, with their channel
    retired: RwLock<Vec<(ElectionId, String)>>,
    sequence: AtomicU32,
}

impl ElectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new election in the candidacy phase
    pub fn open(
        &self,
        reason: impl Into<String>,
        channel: impl Into<String>,
        ends_candidacy_at: Timestamp,
    ) -> (ElectionId, SharedElection) {
        let n = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let id = ElectionId::from_sequence(n);
        let election = Election::new(id.clone(), reason, channel, ends_candidacy_at);
        let shared = Arc::new(Mutex::new(election));
        self.elections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), Arc::clone(&shared));
        (id, shared)
    }

    pub fn get(&self, id: &ElectionId) -> Option<SharedElection> {
        self.elections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Drop a finished election, keeping its id as retired
    ///
    /// `false` when the id is not running.
    pub async fn retire(&self, id: &ElectionId) -> bool {
        let Some(shared) = self.get(id) else {
            return false;
        };
        let channel = shared.lock().await.channel_id().to_string();

        // Recorded before removal so a concurrent lookup always finds one of the two
        self.retired
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id.clone(), channel));
        self.elections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        true
    }

    pub fn is_retired(&self, id: &ElectionId) -> bool {
        self.retired
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|(retired, _)| retired == id)
    }

    /// Most recently retired election of `channel`
    pub fn last_retired_in(&self, channel: &str) -> Option<ElectionId> {
        self.retired
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(_, c)| c == channel)
            .map(|(id, _)| id.clone())
    }

    /// Running elections, sorted by id
    pub fn all(&self) -> Vec<(ElectionId, SharedElection)> {
        let mut all: Vec<_> = self
            .elections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, e)| (id.clone(), Arc::clone(e)))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Ids of the elections in `channel` currently in `phase`
    pub async fn find_in_channel(&self, channel: &str, phase: ElectionPhase) -> Vec<ElectionId> {
        self.filter_channel(channel, Some(phase)).await
    }

    /// Ids of the running elections in `channel`, whatever their phase
    pub async fn running_in_channel(&self, channel: &str) -> Vec<ElectionId> {
        self.filter_channel(channel, None).await
    }

    async fn filter_channel(&self, channel: &str, phase: Option<ElectionPhase>) -> Vec<ElectionId> {
        let mut found = Vec::new();
        // The map guard is dropped before any election lock is awaited
        for (id, election) in self.all() {
            let election = election.lock().await;
            if election.channel_id() == channel && phase.is_none_or(|p| election.phase() == p) {
                found.push(id);
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.elections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_assigns_sequential_ids() {
        let registry = ElectionRegistry::new();
        let (first, _) = registry.open("Moderator", "general", 10);
        let (second, _) = registry.open("Treasurer", "general", 10);
        assert_eq!(first.as_str(), "election-1");
        assert_eq!(second.as_str(), "election-2");

        assert!(registry.retire(&first).await);
        let (third, _) = registry.open("Secretary", "general", 10);
        assert_eq!(third.as_str(), "election-3");
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_retired_ids_are_remembered() {
        let registry = ElectionRegistry::new();
        let (first, _) = registry.open("A", "general", 10);
        let (second, _) = registry.open("B", "general", 10);

        assert!(registry.retire(&first).await);
        assert!(!registry.retire(&first).await);
        assert!(registry.get(&first).is_none());
        assert!(registry.is_retired(&first));
        assert!(!registry.is_retired(&second));
        assert_eq!(registry.last_retired_in("general"), Some(first));
        assert_eq!(registry.last_retired_in("other"), None);

        assert_eq!(registry.running_in_channel("general").await, vec![second]);
    }

    #[tokio::test]
    async fn test_find_in_channel_by_phase() {
        let registry = ElectionRegistry::new();
        let (a, _) = registry.open("A", "general", 10);
        let (_, b) = registry.open("B", "general", 10);
        registry.open("C", "other", 10);
        b.lock().await.cancel();

        assert_eq!(
            registry.find_in_channel("general", ElectionPhase::Candidacy).await,
            vec![a]
        );
        assert!(registry
            .find_in_channel("general", ElectionPhase::Voting)
            .await
            .is_empty());
    }
}
