use std::collections::BTreeMap;

use async_trait::async_trait;
use guardian_core::GuardianSetError;

use crate::{GuardianSetEntry, GuardianSetSource, Network, SourceError};

/// Guardian sets fixed at build time. Entries here take precedence over every other source.
#[derive(Debug, Default, Clone)]
pub struct ManualSource {
    sets: BTreeMap<u32, GuardianSetEntry>,
}

impl ManualSource {
    /// Later entries replace earlier ones with the same index.
    pub fn new(entries: impl IntoIterator<Item = GuardianSetEntry>) -> Self {
        ManualSource {
            sets: entries.into_iter().map(|e| (e.index(), e)).collect(),
        }
    }

    pub fn for_network(network: Network) -> Result<Self, GuardianSetError> {
        network.guardian_sets().map(Self::new)
    }

    pub fn lookup(&self, index: u32) -> Option<&GuardianSetEntry> {
        self.sets.get(&index)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[async_trait]
impl GuardianSetSource for ManualSource {
    async fn current_index(&self) -> Result<u32, SourceError> {
        self.sets
            .keys()
            .next_back()
            .copied()
            .ok_or(SourceError::NotFound)
    }

    async fn get(&self, index: u32) -> Result<Option<GuardianSetEntry>, SourceError> {
        Ok(self.lookup(index).cloned())
    }
}
