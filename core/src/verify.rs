//! The verification gate. Every VAA and every signed observation has to pass one of these checks
//! before anything downstream trusts, stores or forwards it.
//!
//! Both checks are pure: they take an immutable snapshot of the guardian sets and the message and
//! do nothing but signature recovery.

use serde::Serialize;
use thiserror::Error;

use crate::{recover_address, GuardianSet, GuardianSetHistory, SignedObservation, Vaa};

/// Why a message was not accepted. These are ordinary outcomes, the caller drops the message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The VAA names a guardian set beyond the local history. Either the index is forged or this
    /// node has fallen behind a rotation, both need someone to look at it.
    #[error("unknown guardian set {index}, {known} sets are known")]
    UnknownGuardianSet { index: u32, known: usize },
    #[error("signatures are not in strictly ascending guardian order")]
    UnorderedSignatures,
    #[error("unable to encode VAA body: {0}")]
    MalformedBody(String),
    #[error("{valid} valid signatures, {required} required")]
    InsufficientSignatures { valid: usize, required: usize },
    #[error("signature was not produced by the claimed guardian")]
    AddressMismatch,
    #[error("signer is not a member of the current guardian set")]
    UnknownSigner,
}

/// Checks that a quorum of the guardian set named by `vaa.guardian_set_index` signed the body of
/// `vaa`.
///
/// Signatures must be strictly ascending by guardian index, which rules out counting one guardian
/// twice. A signature that fails to decode, names a guardian outside the set or recovers to the
/// wrong key is simply not counted.
pub fn verify_vaa<P: Serialize>(
    history: &GuardianSetHistory,
    vaa: &Vaa<P>,
) -> Result<(), Rejection> {
    let set = history
        .get(vaa.guardian_set_index)
        .ok_or(Rejection::UnknownGuardianSet {
            index: vaa.guardian_set_index,
            known: history.len(),
        })?;

    let ordered = vaa.signatures.windows(2).all(|w| w[0].index < w[1].index);
    if !ordered {
        return Err(Rejection::UnorderedSignatures);
    }

    let digest = vaa
        .digest()
        .map_err(|e| Rejection::MalformedBody(e.to_string()))?;

    let valid = vaa
        .signatures
        .iter()
        .filter(|s| {
            let Some(key) = set.key(s.index) else {
                return false;
            };
            recover_address(&digest.secp256k_hash, &s.signature)
                .map(|addr| addr == *key)
                .unwrap_or(false)
        })
        .count();

    let required = set.quorum();
    if valid < required {
        return Err(Rejection::InsufficientSignatures { valid, required });
    }

    Ok(())
}

/// Checks that `observation` was signed by the guardian it claims and that this guardian belongs
/// to the live guardian set.
pub fn verify_observation(
    live: &GuardianSet,
    observation: &SignedObservation,
) -> Result<(), Rejection> {
    let signer = recover_address(&observation.hash, &observation.signature)
        .map_err(|_| Rejection::AddressMismatch)?;

    if signer != observation.claimed_address {
        return Err(Rejection::AddressMismatch);
    }

    if !live.contains(&signer) {
        return Err(Rejection::UnknownSigner);
    }

    Ok(())
}
