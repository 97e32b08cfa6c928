use guardian_core::{GuardianSet, GuardianSetError, GuardianSetHistory, HistoryError};
use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    ChainConnector, GuardianSetEntry, GuardianSetSource, GuardianSetStore, ManualSource, Network,
    OnChainSource, PersistedSource, SourceError,
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read the highest stored guardian set")]
    Persisted(#[source] SourceError),
    #[error("failed to read the current on-chain guardian set index")]
    OnChain(#[source] SourceError),
    #[error("failed to look up guardian set {index}")]
    Lookup {
        index: u32,
        #[source]
        source: SourceError,
    },
    #[error("guardian set {0} is not available from any source")]
    MissingGuardianSet(u32),
    #[error("failed to store guardian set {index}")]
    Persist {
        index: u32,
        #[source]
        source: anyhow::Error,
    },
    #[error("guardian set history is inconsistent")]
    History(#[from] HistoryError),
}

/// Answers guardian set lookups from the manual table, the local store and the chain, in that
/// order of precedence.
#[derive(Debug)]
pub struct CompositeResolver<C, S> {
    manual: ManualSource,
    persisted: PersistedSource<S>,
    on_chain: OnChainSource<C>,
}

impl<C, S> CompositeResolver<C, S>
where
    C: ChainConnector,
    S: GuardianSetStore,
{
    /// A resolver using the compiled-in guardian sets for `network`.
    pub fn new(network: Network, connector: C, store: S) -> Result<Self, GuardianSetError> {
        Ok(Self::from_sources(
            ManualSource::for_network(network)?,
            PersistedSource::new(store),
            OnChainSource::new(connector),
        ))
    }

    pub fn from_sources(
        manual: ManualSource,
        persisted: PersistedSource<S>,
        on_chain: OnChainSource<C>,
    ) -> Self {
        CompositeResolver {
            manual,
            persisted,
            on_chain,
        }
    }

    pub fn on_chain(&self) -> &OnChainSource<C> {
        &self.on_chain
    }

    pub fn persisted(&self) -> &PersistedSource<S> {
        &self.persisted
    }

    /// Brings the store up to date with the chain and returns every guardian set from 0 up to
    /// the current on-chain index.
    ///
    /// Sets missing from the store are taken from the manual table if present, otherwise from
    /// the chain, and written back before the history is assembled.
    pub async fn load(&self) -> Result<GuardianSetHistory, LoadError> {
        let first = match self.persisted.current_index().await {
            Ok(index) => index.saturating_add(1),
            Err(SourceError::NotFound) => 0,
            Err(e) => return Err(LoadError::Persisted(e)),
        };
        let last = self
            .on_chain
            .current_index()
            .await
            .map_err(LoadError::OnChain)?;

        if first <= last {
            info!("storing guardian sets {first} through {last}");
        }

        for index in first..=last {
            let entry = match self.manual.lookup(index) {
                Some(entry) => entry.clone(),
                None => self
                    .on_chain
                    .get(index)
                    .await
                    .map_err(|source| LoadError::Lookup { index, source })?
                    .ok_or(LoadError::MissingGuardianSet(index))?,
            };

            self.persisted
                .upsert(&entry.set, entry.expiration)
                .await
                .map_err(|source| LoadError::Persist { index, source })?;
            debug!("stored guardian set {index}");
        }

        let mut history = GuardianSetHistory::new();
        for index in 0..=last {
            let entry = self
                .get_guardian_set(index)
                .await
                .map_err(|source| LoadError::Lookup { index, source })?
                .ok_or(LoadError::MissingGuardianSet(index))?;
            history.push(entry.set, entry.expiration)?;
        }

        info!("loaded {} guardian sets, live set is {last}", history.len());
        Ok(history)
    }

    /// Looks up guardian set `index`, trying the manual table, then the store, then the chain.
    ///
    /// A store that cannot be read is skipped so the chain still gets a chance to answer.
    pub async fn get_guardian_set(
        &self,
        index: u32,
    ) -> Result<Option<GuardianSetEntry>, SourceError> {
        if let Some(entry) = self.manual.lookup(index) {
            return Ok(Some(entry.clone()));
        }

        match self.persisted.get(index).await {
            Ok(Some(entry)) => return Ok(Some(entry)),
            Ok(None) => {}
            Err(e) => warn!(
                "skipping stored guardian set {index}: {:#}",
                anyhow::Error::from(e)
            ),
        }

        self.on_chain.get(index).await
    }

    pub async fn add_guardian_set(
        &self,
        set: &GuardianSet,
        expiration: Option<u64>,
    ) -> anyhow::Result<()> {
        self.persisted.upsert(set, expiration).await
    }
}
