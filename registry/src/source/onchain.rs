use anyhow::Context;
use async_trait::async_trait;
use guardian_core::GuardianSet;

use crate::{ChainConnector, GuardianSetEntry, GuardianSetSource, SourceError};

/// Guardian sets as recorded by the Wormhole core contract.
#[derive(Debug, Clone)]
pub struct OnChainSource<C> {
    connector: C,
}

impl<C: ChainConnector> OnChainSource<C> {
    pub fn new(connector: C) -> Self {
        OnChainSource { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }
}

#[async_trait]
impl<C: ChainConnector> GuardianSetSource for OnChainSource<C> {
    async fn current_index(&self) -> Result<u32, SourceError> {
        self.connector
            .current_guardian_set_index()
            .await
            .context("failed to query current guardian set index")
            .map_err(SourceError::Unavailable)
    }

    async fn get(&self, index: u32) -> Result<Option<GuardianSetEntry>, SourceError> {
        let raw = self
            .connector
            .guardian_set(index)
            .await
            .with_context(|| format!("failed to query guardian set {index}"))
            .map_err(SourceError::Unavailable)?;

        // The contract answers with an empty set for indices it has never seen.
        if raw.keys.is_empty() {
            return Ok(None);
        }

        let set = GuardianSet::new(index, raw.keys)
            .with_context(|| format!("contract returned an invalid guardian set {index}"))
            .map_err(SourceError::Unavailable)?;
        let expiration = Some(raw.expiration_time).filter(|&t| t != 0);

        Ok(Some(GuardianSetEntry::new(set, expiration)))
    }
}
