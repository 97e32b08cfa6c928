//! The `guardian_core` crate provides the pure primitives for tracking Wormhole guardian sets and
//! checking the signatures they produce.
//!
//! It includes:
//!
//! - Data types for guardian addresses, guardian sets and the dense history of every set seen.
//! - The VAA and signed observation types along with the digest guardians sign.
//! - The verification gate every inbound message has to pass before it is trusted.
//!
//! Nothing in this crate performs I/O. Fetching and synchronizing guardian sets lives in the
//! `guardian_registry` crate.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod crypto;
#[cfg(any(test, feature = "fake"))]
pub mod fake;
mod guardian_set;
mod observation;
mod serde_array;
pub mod vaa;
mod verify;

pub use wormhole_supported_chains::Chain;
pub use {
    crypto::recover_address,
    guardian_set::{GuardianSet, GuardianSetError, GuardianSetHistory, HistoryError},
    observation::{InvalidMessageId, MessageId, SignedObservation},
    vaa::{Signature, Vaa},
    verify::{verify_observation, verify_vaa, Rejection},
};

/// Largest number of guardians a set may hold. Signatures address guardians with a single byte.
pub const MAX_GUARDIANS: usize = 256;

/// The address of a guardian: the last 20 bytes of the Keccak256 hash of its uncompressed
/// secp256k1 public key, the same derivation Ethereum uses for account addresses.
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct GuardianAddress(pub [u8; 20]);

impl fmt::Display for GuardianAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid guardian address: {0}")]
pub struct InvalidAddress(String);

impl FromStr for GuardianAddress {
    type Err = InvalidAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut addr = [0u8; 20];
        hex::decode_to_slice(digits, &mut addr).map_err(|_| InvalidAddress(s.into()))?;
        Ok(GuardianAddress(addr))
    }
}

/// Wormhole specifies emitter addresses as 32 bytes. Addresses that are shorter, for example 20
/// byte Ethereum addresses, are left zero padded to 32.
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Address(pub [u8; 32]);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
