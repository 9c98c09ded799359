//! Council registry
//!
//! Holds every council behind its own async mutex. Whoever holds a
//! council's lock is the only one mutating it, which serializes events per
//! council while different councils proceed independently.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use votum_domain::{Council, CouncilId};

pub type SharedCouncil = Arc<Mutex<Council>>;

#[derive(Default)]
pub struct CouncilRegistry {
    councils: RwLock<HashMap<CouncilId, SharedCouncil>>,
}

impl CouncilRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a council, replacing any council with the same id
    pub fn insert(&self, council: Council) -> SharedCouncil {
        let id = council.id().clone();
        let shared = Arc::new(Mutex::new(council));
        self.councils
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&shared));
        shared
    }

    pub fn get(&self, id: &CouncilId) -> Option<SharedCouncil> {
        self.councils
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Ids of all councils, sorted
    pub fn ids(&self) -> Vec<CouncilId> {
        let mut ids: Vec<CouncilId> = self
            .councils
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.councils
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
