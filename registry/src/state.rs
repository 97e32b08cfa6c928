use std::sync::Arc;

use guardian_core::{GuardianSet, GuardianSetHistory, HistoryError};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};

/// An immutable view of every known guardian set, paired with the set that is live at the time
/// the view was taken.
#[derive(Debug, Clone)]
pub struct GuardianSnapshot {
    history: GuardianSetHistory,
    live: Arc<GuardianSet>,
}

impl GuardianSnapshot {
    fn new(history: GuardianSetHistory) -> Result<Self, HistoryError> {
        let live = history.latest().cloned().ok_or(HistoryError::Empty)?;
        Ok(GuardianSnapshot { history, live })
    }

    pub fn history(&self) -> &GuardianSetHistory {
        &self.history
    }

    pub fn live(&self) -> &Arc<GuardianSet> {
        &self.live
    }

    pub fn latest_index(&self) -> u32 {
        self.live.index()
    }
}

/// The guardian set state shared between the synchronizer and everything that verifies
/// messages.
///
/// Readers grab the current snapshot and drop the lock straight away. The synchronizer is the
/// only writer; it builds the next snapshot on the side and swaps it in, so history and live set
/// always change together.
#[derive(Debug)]
pub struct SharedGuardianSets {
    current: RwLock<Arc<GuardianSnapshot>>,
}

impl SharedGuardianSets {
    /// Fails if `history` is empty: there has to be a live set.
    pub fn new(history: GuardianSetHistory) -> Result<Self, HistoryError> {
        Ok(SharedGuardianSets {
            current: RwLock::new(Arc::new(GuardianSnapshot::new(history)?)),
        })
    }

    pub fn snapshot(&self) -> Arc<GuardianSnapshot> {
        self.current.read().clone()
    }

    pub fn history(&self) -> GuardianSetHistory {
        self.snapshot().history.clone()
    }

    pub fn live(&self) -> Arc<GuardianSet> {
        self.current.read().live.clone()
    }

    pub fn latest_index(&self) -> u32 {
        self.current.read().latest_index()
    }

    /// Appends `set` to the history and makes it live. `set` must carry the next consecutive
    /// index.
    pub(crate) fn apply(
        &self,
        set: GuardianSet,
        expiration: Option<u64>,
    ) -> Result<Arc<GuardianSet>, HistoryError> {
        let current = self.current.upgradable_read();

        let mut history = current.history.clone();
        let live = history.push(set, expiration)?.clone();
        let next = Arc::new(GuardianSnapshot {
            history,
            live: live.clone(),
        });

        *RwLockUpgradableReadGuard::upgrade(current) = next;
        Ok(live)
    }
}

#[cfg(test)]
mod test {
    use guardian_core::GuardianAddress;

    use super::*;

    fn set(index: u32, seed: u8) -> GuardianSet {
        GuardianSet::new(index, vec![GuardianAddress([seed; 20])]).unwrap()
    }

    fn shared(n: u32) -> SharedGuardianSets {
        let mut history = GuardianSetHistory::new();
        for i in 0..n {
            history.push(set(i, i as u8), None).unwrap();
        }
        SharedGuardianSets::new(history).unwrap()
    }

    #[test]
    fn empty_history_has_no_live_set() {
        assert_eq!(
            HistoryError::Empty,
            SharedGuardianSets::new(GuardianSetHistory::new()).unwrap_err()
        );
    }

    #[test]
    fn apply_swaps_history_and_live_together() {
        let state = shared(2);
        let before = state.snapshot();

        let live = state.apply(set(2, 9), Some(50)).unwrap();
        assert_eq!(2, live.index());
        assert_eq!(2, state.latest_index());
        assert_eq!(live, state.live());
        assert_eq!(3, state.history().len());
        assert_eq!(Some(50), state.history().expiration(2));

        // Snapshots taken earlier are unaffected.
        assert_eq!(1, before.latest_index());
        assert_eq!(2, before.history().len());
    }

    #[test]
    fn apply_rejects_gaps() {
        let state = shared(2);
        let err = state.apply(set(3, 9), None).unwrap_err();
        assert_eq!(
            HistoryError::NonConsecutive {
                expected: 2,
                actual: 3
            },
            err
        );
        assert_eq!(1, state.latest_index());
    }
}
