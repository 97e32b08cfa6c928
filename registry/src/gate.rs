use std::{collections::BTreeMap, sync::Arc};

use guardian_core::{verify_observation, verify_vaa, Rejection, SignedObservation, Vaa};
use log::{debug, error};
use serde::Serialize;

use crate::{Alerter, SharedGuardianSets, UNKNOWN_GUARDIAN_SET_ALERT};

/// Runs inbound messages through the verification gate against the shared guardian sets, raising
/// an alert whenever a VAA names a guardian set this node has never seen.
pub struct Gatekeeper<A> {
    guardian_sets: Arc<SharedGuardianSets>,
    alerter: A,
}

impl<A: Alerter> Gatekeeper<A> {
    pub fn new(guardian_sets: Arc<SharedGuardianSets>, alerter: A) -> Self {
        Gatekeeper {
            guardian_sets,
            alerter,
        }
    }

    pub fn guardian_sets(&self) -> &Arc<SharedGuardianSets> {
        &self.guardian_sets
    }

    pub fn verify_vaa<P: Serialize>(&self, vaa: &Vaa<P>) -> Result<(), Rejection> {
        let snapshot = self.guardian_sets.snapshot();

        let res = verify_vaa(snapshot.history(), vaa);
        match &res {
            Err(Rejection::UnknownGuardianSet { index, known }) => {
                let context = BTreeMap::from([
                    ("guardian_set_index".to_string(), index.to_string()),
                    ("known_guardian_sets".to_string(), known.to_string()),
                    (
                        "emitter_chain".to_string(),
                        u16::from(vaa.emitter_chain).to_string(),
                    ),
                    (
                        "emitter_address".to_string(),
                        vaa.emitter_address.to_string(),
                    ),
                    ("sequence".to_string(), vaa.sequence.to_string()),
                ]);
                if let Err(e) = self.alerter.send_alert(UNKNOWN_GUARDIAN_SET_ALERT, &context) {
                    error!("failed to send {UNKNOWN_GUARDIAN_SET_ALERT} alert: {e:#}");
                }
            }
            Err(e) => debug!(
                "rejected VAA {}/{}/{}: {e}",
                u16::from(vaa.emitter_chain),
                vaa.emitter_address,
                vaa.sequence
            ),
            Ok(()) => {}
        }

        res
    }

    /// Checks `observation` against the guardian set that is live right now.
    pub fn verify_observation(&self, observation: &SignedObservation) -> Result<(), Rejection> {
        let live = self.guardian_sets.live();

        verify_observation(&live, observation).map_err(|e| {
            debug!(
                "rejected observation {} from {}: {e}",
                observation.message_id, observation.claimed_address
            );
            e
        })
    }
}
