use async_trait::async_trait;
use guardian_core::GuardianSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod manual;
mod onchain;
mod persisted;

pub use {manual::ManualSource, onchain::OnChainSource, persisted::PersistedSource};

/// A guardian set together with the unix time (in seconds) after which it stops being valid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GuardianSetEntry {
    pub set: GuardianSet,
    pub expiration: Option<u64>,
}

impl GuardianSetEntry {
    pub fn new(set: GuardianSet, expiration: Option<u64>) -> Self {
        GuardianSetEntry { set, expiration }
    }

    pub fn index(&self) -> u32 {
        self.set.index()
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no guardian sets present")]
    NotFound,
    #[error("guardian set source unavailable")]
    Unavailable(#[source] anyhow::Error),
}

/// Somewhere guardian sets can be looked up by index.
///
/// A set that the source simply does not have is `Ok(None)`. Errors are reserved for sources
/// that hold nothing at all ([`SourceError::NotFound`]) or cannot be queried.
#[async_trait]
pub trait GuardianSetSource: Send + Sync {
    /// Highest guardian set index this source knows about.
    async fn current_index(&self) -> Result<u32, SourceError>;

    async fn get(&self, index: u32) -> Result<Option<GuardianSetEntry>, SourceError>;
}
