use async_trait::async_trait;
use guardian_core::GuardianAddress;

/// A guardian set as the core contract reports it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OnChainGuardianSet {
    /// Empty when the contract has no set at the requested index.
    pub keys: Vec<GuardianAddress>,
    /// Unix seconds after which the set expires, 0 while it is still current.
    pub expiration_time: u64,
}

/// Read access to the Wormhole core contract on one chain.
///
/// Implementations surface every failure to reach the chain as an error. They must never paper
/// over a failed call with an empty or default answer.
#[async_trait]
pub trait ChainConnector: Send + Sync {
    async fn current_guardian_set_index(&self) -> anyhow::Result<u32>;

    async fn guardian_set(&self, index: u32) -> anyhow::Result<OnChainGuardianSet>;
}
