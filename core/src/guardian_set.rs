use std::{collections::BTreeSet, sync::Arc};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GuardianAddress, MAX_GUARDIANS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuardianSetError {
    #[error("guardian set {0} has no keys")]
    Empty(u32),
    #[error("guardian set {index} has {len} keys, at most {} are addressable", MAX_GUARDIANS)]
    TooManyKeys { index: u32, len: usize },
    #[error("guardian set {index} lists {key} more than once")]
    DuplicateKey { index: u32, key: GuardianAddress },
}

/// A `GuardianSet` is a versioned set of keys that can sign Wormhole messages. The position of a
/// key in `keys` is the index that guardian signs with for as long as this set is active.
///
/// Sets are immutable once built; a rotation produces a new set with the next index.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "RawGuardianSet")]
pub struct GuardianSet {
    index: u32,
    keys: Vec<GuardianAddress>,
}

#[derive(Deserialize)]
struct RawGuardianSet {
    index: u32,
    keys: Vec<GuardianAddress>,
}

impl TryFrom<RawGuardianSet> for GuardianSet {
    type Error = GuardianSetError;

    fn try_from(raw: RawGuardianSet) -> Result<Self, Self::Error> {
        GuardianSet::new(raw.index, raw.keys)
    }
}

impl GuardianSet {
    pub fn new(index: u32, keys: Vec<GuardianAddress>) -> Result<Self, GuardianSetError> {
        if keys.is_empty() {
            return Err(GuardianSetError::Empty(index));
        }
        if keys.len() > MAX_GUARDIANS {
            return Err(GuardianSetError::TooManyKeys {
                index,
                len: keys.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for k in &keys {
            if !seen.insert(*k) {
                return Err(GuardianSetError::DuplicateKey { index, key: *k });
            }
        }

        Ok(GuardianSet { index, keys })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn keys(&self) -> &[GuardianAddress] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The key a guardian signs with at position `index`.
    pub fn key(&self, index: u8) -> Option<&GuardianAddress> {
        self.keys.get(usize::from(index))
    }

    pub fn contains(&self, addr: &GuardianAddress) -> bool {
        self.keys.contains(addr)
    }

    /// The signing position of `addr` within this set.
    pub fn position(&self, addr: &GuardianAddress) -> Option<u8> {
        self.keys
            .iter()
            .position(|k| k == addr)
            .and_then(|p| u8::try_from(p).ok())
    }

    /// Minimum number of distinct valid signatures needed to accept a VAA signed by this set.
    pub fn quorum(&self) -> usize {
        self.keys.len() * 2 / 3 + 1
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("guardian set history expected index {expected} but got {actual}")]
    NonConsecutive { expected: u32, actual: u32 },
    #[error("guardian set history is empty")]
    Empty,
}

/// Every guardian set seen so far, ordered by index with no gaps.
///
/// `sets[i].index() == i` holds for every entry. The history only grows: entries are appended
/// one index at a time and never replaced or removed. Sets are reference counted so cloning a
/// history to extend it does not copy any keys.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GuardianSetHistory {
    sets: Vec<Arc<GuardianSet>>,
    expirations: Vec<Option<u64>>,
}

impl GuardianSetHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `set`, which must carry the next consecutive index. `expiration` is the unix time
    /// in seconds after which the set stops being valid, `None` if it has not been scheduled.
    /// Returns the appended set.
    pub fn push(
        &mut self,
        set: GuardianSet,
        expiration: Option<u64>,
    ) -> Result<&Arc<GuardianSet>, HistoryError> {
        let expected = self.next_index();
        if set.index != expected {
            return Err(HistoryError::NonConsecutive {
                expected,
                actual: set.index,
            });
        }

        self.expirations.push(expiration);
        self.sets.push(Arc::new(set));
        Ok(&self.sets[self.sets.len() - 1])
    }

    /// Index the next appended set must have.
    pub fn next_index(&self) -> u32 {
        // Sets are addressed by u32 so the history can never outgrow it.
        self.sets.len() as u32
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&Arc<GuardianSet>> {
        self.sets.get(index as usize)
    }

    pub fn expiration(&self, index: u32) -> Option<u64> {
        self.expirations.get(index as usize).copied().flatten()
    }

    /// The most recent guardian set, i.e. the live one.
    pub fn latest(&self) -> Option<&Arc<GuardianSet>> {
        self.sets.last()
    }

    /// Whether set `index` is known and not expired at `now` (unix seconds). An expiration of 0
    /// is treated the same as no expiration.
    pub fn is_active(&self, index: u32, now: u64) -> bool {
        if self.get(index).is_none() {
            return false;
        }

        match self.expiration(index) {
            None | Some(0) => true,
            Some(exp) => now <= exp,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<GuardianSet>> {
        self.sets.iter()
    }
}
