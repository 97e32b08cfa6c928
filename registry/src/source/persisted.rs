use anyhow::Context;
use async_trait::async_trait;
use guardian_core::GuardianSet;

use crate::{GuardianSetEntry, GuardianSetSource, GuardianSetStore, SourceError};

/// Guardian sets this node has already written to its store.
#[derive(Debug, Clone)]
pub struct PersistedSource<S> {
    store: S,
}

impl<S: GuardianSetStore> PersistedSource<S> {
    pub fn new(store: S) -> Self {
        PersistedSource { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn upsert(&self, set: &GuardianSet, expiration: Option<u64>) -> anyhow::Result<()> {
        self.store
            .upsert_guardian_set(set, expiration)
            .await
            .with_context(|| format!("failed to store guardian set {}", set.index()))
    }

    async fn all(&self) -> Result<Vec<GuardianSetEntry>, SourceError> {
        self.store
            .find_all_guardian_sets()
            .await
            .context("failed to read stored guardian sets")
            .map_err(SourceError::Unavailable)
    }
}

#[async_trait]
impl<S: GuardianSetStore> GuardianSetSource for PersistedSource<S> {
    async fn current_index(&self) -> Result<u32, SourceError> {
        self.all()
            .await?
            .iter()
            .map(GuardianSetEntry::index)
            .max()
            .ok_or(SourceError::NotFound)
    }

    async fn get(&self, index: u32) -> Result<Option<GuardianSetEntry>, SourceError> {
        Ok(self.all().await?.into_iter().find(|e| e.index() == index))
    }
}

#[cfg(test)]
mod test {
    use guardian_core::GuardianAddress;

    use super::*;
    use crate::MemoryGuardianSetStore;

    fn set(index: u32) -> GuardianSet {
        GuardianSet::new(index, vec![GuardianAddress([index as u8 + 1; 20])]).unwrap()
    }

    #[tokio::test]
    async fn empty_store_is_not_found() {
        let src = PersistedSource::new(MemoryGuardianSetStore::new());
        assert!(matches!(
            src.current_index().await,
            Err(SourceError::NotFound)
        ));
        assert!(src.get(0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn current_index_is_highest_stored() {
        let src = PersistedSource::new(MemoryGuardianSetStore::new());
        src.upsert(&set(2), None).await.unwrap();
        src.upsert(&set(0), Some(7)).await.unwrap();

        assert_eq!(2, src.current_index().await.unwrap());
        let entry = src.get(0).await.unwrap().unwrap();
        assert_eq!(set(0), entry.set);
        assert_eq!(Some(7), entry.expiration);
        assert!(src.get(1).await.unwrap().is_none());
    }
}
