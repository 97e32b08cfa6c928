use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use guardian_core::GuardianSet;
use parking_lot::RwLock;

use crate::GuardianSetEntry;

/// Durable cache of guardian sets, keyed by guardian set index.
#[async_trait]
pub trait GuardianSetStore: Send + Sync {
    /// Every stored guardian set, in any order.
    async fn find_all_guardian_sets(&self) -> anyhow::Result<Vec<GuardianSetEntry>>;

    /// Stores `set`, replacing whatever was stored under the same index.
    async fn upsert_guardian_set(
        &self,
        set: &GuardianSet,
        expiration: Option<u64>,
    ) -> anyhow::Result<()>;
}

/// A [`GuardianSetStore`] that lives in memory. Clones share the same sets.
#[derive(Debug, Default, Clone)]
pub struct MemoryGuardianSetStore {
    sets: Arc<RwLock<BTreeMap<u32, GuardianSetEntry>>>,
}

impl MemoryGuardianSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.read().is_empty()
    }

    pub fn get(&self, index: u32) -> Option<GuardianSetEntry> {
        self.sets.read().get(&index).cloned()
    }
}

#[async_trait]
impl GuardianSetStore for MemoryGuardianSetStore {
    async fn find_all_guardian_sets(&self) -> anyhow::Result<Vec<GuardianSetEntry>> {
        Ok(self.sets.read().values().cloned().collect())
    }

    async fn upsert_guardian_set(
        &self,
        set: &GuardianSet,
        expiration: Option<u64>,
    ) -> anyhow::Result<()> {
        let entry = GuardianSetEntry {
            set: set.clone(),
            expiration,
        };
        let _ = self.sets.write().insert(set.index(), entry);
        Ok(())
    }
}
