#![allow(dead_code)]

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use guardian_core::{
    fake::GuardianKeeper,
    vaa::{Body, Vaa},
    Address, Chain, GuardianAddress, GuardianSet, MessageId,
};
use guardian_registry::{
    Alerter, ChainConnector, CompositeResolver, GuardianSetEntry, GuardianSetStore, ManualSource,
    MemoryGuardianSetStore, OnChainGuardianSet, OnChainSource, PersistedSource, Synchronizer,
};
use parking_lot::Mutex;
use serde_wormhole::RawMessage;

pub const POLL_INTERVAL: Duration = Duration::from_secs(15);

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A guardian set of `n` made-up guardians. Different seeds give disjoint keys.
pub fn guardian_set(index: u32, n: u8, seed: u8) -> GuardianSet {
    let keys = (0..n)
        .map(|i| {
            let mut a = [seed; 20];
            a[19] = i;
            GuardianAddress(a)
        })
        .collect();
    GuardianSet::new(index, keys).unwrap()
}

#[derive(Default)]
struct ChainState {
    current: u32,
    sets: BTreeMap<u32, OnChainGuardianSet>,
    failing: bool,
}

/// A core contract that lives in memory. Clones share the same chain.
#[derive(Clone, Default)]
pub struct FakeConnector {
    state: Arc<Mutex<ChainState>>,
}

impl FakeConnector {
    /// A chain that has seen sets `0..count`, each with 3 guardians.
    pub fn with_sets(count: u32) -> Self {
        let connector = FakeConnector::default();
        for index in 0..count {
            connector.rotate(&guardian_set(index, 3, index as u8 + 1), 0);
        }
        connector
    }

    /// Records `set` on chain and makes it the current one.
    pub fn rotate(&self, set: &GuardianSet, expiration_time: u64) {
        let mut state = self.state.lock();
        state.current = set.index();
        state.sets.insert(
            set.index(),
            OnChainGuardianSet {
                keys: set.keys().to_vec(),
                expiration_time,
            },
        );
    }

    /// Points the current index at `index` without recording a set for it.
    pub fn set_current(&self, index: u32) {
        self.state.lock().current = index;
    }

    pub fn remove(&self, index: u32) {
        self.state.lock().sets.remove(&index);
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }
}

#[async_trait]
impl ChainConnector for FakeConnector {
    async fn current_guardian_set_index(&self) -> anyhow::Result<u32> {
        let state = self.state.lock();
        if state.failing {
            bail!("rpc connection refused");
        }
        Ok(state.current)
    }

    async fn guardian_set(&self, index: u32) -> anyhow::Result<OnChainGuardianSet> {
        let state = self.state.lock();
        if state.failing {
            bail!("rpc connection refused");
        }
        // The contract answers unknown indices with an empty set.
        Ok(state.sets.get(&index).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct StoreState {
    upserts: Vec<u32>,
    failing_reads: bool,
    failing_writes: bool,
}

/// A [`MemoryGuardianSetStore`] that records writes and can be made to fail.
#[derive(Clone, Default)]
pub struct RecordingStore {
    inner: MemoryGuardianSetStore,
    state: Arc<Mutex<StoreState>>,
}

impl RecordingStore {
    /// Stores `sets` without recording them as upserts.
    pub async fn seed(&self, sets: impl IntoIterator<Item = GuardianSet>) {
        for set in sets {
            self.inner.upsert_guardian_set(&set, None).await.unwrap();
        }
    }

    pub fn upserts(&self) -> Vec<u32> {
        self.state.lock().upserts.clone()
    }

    pub fn get(&self, index: u32) -> Option<GuardianSetEntry> {
        self.inner.get(index)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn set_failing_reads(&self, failing: bool) {
        self.state.lock().failing_reads = failing;
    }

    pub fn set_failing_writes(&self, failing: bool) {
        self.state.lock().failing_writes = failing;
    }
}

#[async_trait]
impl GuardianSetStore for RecordingStore {
    async fn find_all_guardian_sets(&self) -> anyhow::Result<Vec<GuardianSetEntry>> {
        if self.state.lock().failing_reads {
            return Err(anyhow!("database is locked"));
        }
        self.inner.find_all_guardian_sets().await
    }

    async fn upsert_guardian_set(
        &self,
        set: &GuardianSet,
        expiration: Option<u64>,
    ) -> anyhow::Result<()> {
        if self.state.lock().failing_writes {
            return Err(anyhow!("disk full"));
        }
        self.inner.upsert_guardian_set(set, expiration).await?;
        self.state.lock().upserts.push(set.index());
        Ok(())
    }
}

/// Collects every alert it is handed.
#[derive(Clone, Default)]
pub struct RecordingAlerter {
    alerts: Arc<Mutex<Vec<(String, BTreeMap<String, String>)>>>,
    failing: Arc<Mutex<bool>>,
}

impl RecordingAlerter {
    pub fn alerts(&self) -> Vec<(String, BTreeMap<String, String>)> {
        self.alerts.lock().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }
}

impl Alerter for RecordingAlerter {
    fn send_alert(&self, key: &str, context: &BTreeMap<String, String>) -> anyhow::Result<()> {
        self.alerts.lock().push((key.into(), context.clone()));
        if *self.failing.lock() {
            bail!("alert queue is full");
        }
        Ok(())
    }
}

pub fn resolver(
    manual: ManualSource,
    connector: &FakeConnector,
    store: &RecordingStore,
) -> CompositeResolver<FakeConnector, RecordingStore> {
    CompositeResolver::from_sources(
        manual,
        PersistedSource::new(store.clone()),
        OnChainSource::new(connector.clone()),
    )
}

pub async fn synchronizer(
    connector: &FakeConnector,
    store: &RecordingStore,
) -> Synchronizer<FakeConnector, RecordingStore> {
    Synchronizer::new(
        resolver(ManualSource::default(), connector, store),
        POLL_INTERVAL,
    )
    .await
    .unwrap()
}

pub fn message_id() -> MessageId {
    MessageId {
        emitter_chain: Chain::Ethereum,
        emitter_address: Address([0x2a; 32]),
        sequence: 42,
    }
}

pub fn body() -> Body<&'static RawMessage> {
    Body {
        timestamp: 1_700_000_000,
        nonce: 7,
        emitter_chain: Chain::Ethereum,
        emitter_address: Address([0x2a; 32]),
        sequence: 42,
        consistency_level: 1,
        payload: RawMessage::new(b"guardian set registry"),
    }
}

/// A VAA over [`body`] signed by every guardian `keeper` holds.
pub fn signed_vaa(keeper: &GuardianKeeper) -> Vaa<&'static RawMessage> {
    keeper.sign_vaa(body())
}
