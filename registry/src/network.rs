use std::{fmt, str::FromStr};

use guardian_core::{GuardianAddress, GuardianSet, GuardianSetError};
use hex_literal::hex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::GuardianSetEntry;

/// The Wormhole deployment a node is attached to. Selects the compiled-in guardian sets.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown network {0:?}, expected one of mainnet, testnet, devnet")]
pub struct InvalidNetwork(String);

impl FromStr for Network {
    type Err = InvalidNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            _ => Err(InvalidNetwork(s.into())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
        })
    }
}

struct Table {
    index: u32,
    keys: &'static [[u8; 20]],
    expiration: Option<u64>,
}

const MAINNET: &[Table] = &[
    Table {
        index: 0,
        keys: &[hex!("58cc3ae5c097b213ce3c81979e1b9f9570746aa5")],
        expiration: None,
    },
    Table {
        index: 1,
        keys: &[
            hex!("58cc3ae5c097b213ce3c81979e1b9f9570746aa5"),
            hex!("ff6cb952589bde862c25ef4392132fb9d4a42157"),
            hex!("114de8460193bdf3a2fcf81f86a09765f4762fd1"),
            hex!("107a0086b32d7a0977926a205131d8731d39cbeb"),
            hex!("8c82b2fd82faed2711d59af0f2499d16e726f6b2"),
            hex!("11b39756c042441be6d8650b69b54ebe715e2343"),
            hex!("54ce5b4d348fb74b958e8966e2ec3dbd4958a7cd"),
            hex!("eb5f7389fa26941519f0863349c223b73a6ddee7"),
            hex!("74a3bf913953d695260d88bc1aa25a4eee363ef0"),
            hex!("000ac0076727b35fbea2dac28fee5ccb0fea768e"),
            hex!("af45ced136b9d9e24903464ae889f5c8a723fc14"),
            hex!("f93124b7c738843cbb89e864c862c38cddcccf95"),
            hex!("d2cc37a4dc036a8d232b48f62cdd4731412f4890"),
            hex!("da798f6896a3331f64b48c12d1d57fd9cbe70811"),
            hex!("71aa1be1d36cafe3867910f99c09e347899c19c3"),
            hex!("8192b6e7387ccd768277c17dab1b7a5027c0b3cf"),
            hex!("178e21ad2e77ae06711549cfbb1f9c7a9d8096e8"),
            hex!("5e1487f35515d02a92753504a8d75471b9f49edb"),
            hex!("6fbebc898f403e4773e95feb15e80c9a99c8348d"),
        ],
        expiration: None,
    },
];

const TESTNET: &[Table] = &[Table {
    index: 0,
    keys: &[hex!("13947bd48b18e53fdaeee77f3473391ac727c638")],
    expiration: None,
}];

// The single guardian every local devnet starts with.
const DEVNET: &[Table] = &[Table {
    index: 0,
    keys: &[hex!("befa429d57cd18b7f8a4d91a2da9ab4af05d0fbe")],
    expiration: None,
}];

impl Network {
    /// The guardian sets known ahead of time for this network, ordered by index.
    pub fn guardian_sets(&self) -> Result<Vec<GuardianSetEntry>, GuardianSetError> {
        let table = match self {
            Network::Mainnet => MAINNET,
            Network::Testnet => TESTNET,
            Network::Devnet => DEVNET,
        };

        table
            .iter()
            .map(|t| {
                let keys = t.keys.iter().copied().map(GuardianAddress).collect();
                Ok(GuardianSetEntry {
                    set: GuardianSet::new(t.index, keys)?,
                    expiration: t.expiration,
                })
            })
            .collect()
    }
}
