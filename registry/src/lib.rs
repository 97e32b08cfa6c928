//! Keeps a node's view of the Wormhole guardian sets in step with the chain and gates inbound
//! messages on it.
//!
//! ## Overview
//!
//! Guardian sets come from three sources, consulted in a fixed order:
//!
//! 1. [`ManualSource`]: sets compiled into the binary for each [`Network`]. They override
//!    anything else so a bad on-chain or cached entry can be corrected without a redeploy.
//! 2. [`PersistedSource`]: sets this node has already stored.
//! 3. [`OnChainSource`]: the core contract, which is the source of truth for how many sets
//!    exist.
//!
//! [`CompositeResolver::load`] runs once at startup and fills every gap between what is stored and
//! what exists on chain. Its result seeds a [`Synchronizer`], which polls the chain for rotations
//! and publishes each new set to the [`SharedGuardianSets`] every verification reads. The
//! [`Gatekeeper`] checks inbound VAAs and observations against that shared state.
//!
//! Transport, storage engines, alert delivery and metrics are outside this crate; they plug in
//! through [`ChainConnector`], [`GuardianSetStore`] and [`Alerter`].

mod alert;
mod config;
mod connector;
mod gate;
mod network;
mod resolver;
mod source;
mod state;
mod store;
mod synchronizer;

pub use {
    alert::{Alerter, LogAlerter, UNKNOWN_GUARDIAN_SET_ALERT},
    config::{Config, ConfigError, DEFAULT_POLL_INTERVAL_SECS},
    connector::{ChainConnector, OnChainGuardianSet},
    gate::Gatekeeper,
    network::{InvalidNetwork, Network},
    resolver::{CompositeResolver, LoadError},
    source::{
        GuardianSetEntry, GuardianSetSource, ManualSource, OnChainSource, PersistedSource,
        SourceError,
    },
    state::{GuardianSnapshot, SharedGuardianSets},
    store::{GuardianSetStore, MemoryGuardianSetStore},
    synchronizer::{SyncError, Synchronizer},
};
