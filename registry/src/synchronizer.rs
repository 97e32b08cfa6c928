use std::{sync::Arc, time::Duration};

use guardian_core::HistoryError;
use log::{error, info, trace, warn};
use thiserror::Error;
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    ChainConnector, CompositeResolver, GuardianSetEntry, GuardianSetSource, GuardianSetStore,
    LoadError, SharedGuardianSets,
};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("guardian set history is inconsistent")]
    Consistency(#[from] HistoryError),
}

/// Follows guardian set rotations on chain and publishes each new set to the shared state.
pub struct Synchronizer<C, S> {
    resolver: CompositeResolver<C, S>,
    state: Arc<SharedGuardianSets>,
    poll_interval: Duration,
    unpersisted: Vec<GuardianSetEntry>,
}

impl<C, S> Synchronizer<C, S>
where
    C: ChainConnector + 'static,
    S: GuardianSetStore + 'static,
{
    /// Loads every guardian set up to the current on-chain index. Nothing is shared until this
    /// succeeds.
    pub async fn new(
        resolver: CompositeResolver<C, S>,
        poll_interval: Duration,
    ) -> Result<Self, LoadError> {
        let history = resolver.load().await?;
        let state = Arc::new(SharedGuardianSets::new(history)?);

        Ok(Synchronizer {
            resolver,
            state,
            poll_interval,
            unpersisted: Vec::new(),
        })
    }

    /// Handle to the state this synchronizer keeps current.
    pub fn guardian_sets(&self) -> Arc<SharedGuardianSets> {
        self.state.clone()
    }

    pub fn resolver(&self) -> &CompositeResolver<C, S> {
        &self.resolver
    }

    /// Checks the chain once and applies any guardian sets newer than the live one.
    ///
    /// Failing to reach the chain or a source only skips this check. The only error is a set
    /// that does not follow on from the history.
    pub async fn tick(&mut self) -> Result<(), SyncError> {
        let current = self.state.latest_index();
        let latest = match self.resolver.on_chain().current_index().await {
            Ok(latest) => latest,
            Err(e) => {
                warn!(
                    "failed to query current guardian set index: {:#}",
                    anyhow::Error::from(e)
                );
                return Ok(());
            }
        };
        trace!("live guardian set {current}, on-chain guardian set {latest}");

        if latest <= current {
            return Ok(());
        }

        self.retry_unpersisted().await;

        for index in current + 1..=latest {
            let entry = match self.resolver.get_guardian_set(index).await {
                Ok(Some(entry)) => entry,
                Ok(None) => {
                    warn!("guardian set {index} is not available yet");
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        "failed to fetch guardian set {index}: {:#}",
                        anyhow::Error::from(e)
                    );
                    return Ok(());
                }
            };

            let live = self.state.apply(entry.set.clone(), entry.expiration)?;
            info!(
                "guardian set {} is now live with {} guardians",
                live.index(),
                live.len()
            );

            if let Err(e) = self
                .resolver
                .add_guardian_set(&entry.set, entry.expiration)
                .await
            {
                error!("{e:#}");
                self.unpersisted.push(entry);
            }
        }

        Ok(())
    }

    async fn retry_unpersisted(&mut self) {
        let pending = std::mem::take(&mut self.unpersisted);
        for entry in pending {
            match self
                .resolver
                .add_guardian_set(&entry.set, entry.expiration)
                .await
            {
                Ok(()) => info!("stored guardian set {} on retry", entry.index()),
                Err(e) => {
                    error!("{e:#}");
                    self.unpersisted.push(entry);
                }
            }
        }
    }

    /// Polls the chain every `poll_interval` until `token` is cancelled.
    pub async fn run(mut self, token: CancellationToken) -> Result<(), SyncError> {
        let mut interval = time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately and the state is fresh from `new`.
        interval.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    info!("guardian set synchronizer stopped");
                    return Ok(());
                }
                _ = interval.tick() => self.tick().await?,
            }
        }
    }

    /// Spawns [`Synchronizer::run`] on the current Tokio runtime.
    pub fn start(self, token: CancellationToken) -> JoinHandle<Result<(), SyncError>> {
        tokio::spawn(self.run(token))
    }
}
