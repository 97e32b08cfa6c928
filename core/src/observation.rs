use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Address, Chain, GuardianAddress};

/// Identifies a message by its emitter and sequence. Rendered as
/// `<chain id>/<emitter address hex>/<sequence>`, the form guardians gossip it in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId {
    pub emitter_chain: Chain,
    pub emitter_address: Address,
    pub sequence: u64,
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            u16::from(self.emitter_chain),
            self.emitter_address,
            self.sequence
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid message id: {0}")]
pub struct InvalidMessageId(String);

impl FromStr for MessageId {
    type Err = InvalidMessageId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidMessageId(s.into());

        let mut parts = s.split('/');
        let (Some(chain), Some(emitter), Some(sequence), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };

        let chain = chain.parse::<u16>().map_err(|_| err())?;
        let mut emitter_address = [0u8; 32];
        hex::decode_to_slice(emitter, &mut emitter_address).map_err(|_| err())?;
        let sequence = sequence.parse().map_err(|_| err())?;

        Ok(MessageId {
            emitter_chain: Chain::from(chain),
            emitter_address: Address(emitter_address),
            sequence,
        })
    }
}

/// A single guardian's signature over the digest of a message it observed, gossiped before the
/// network reaches consensus. Unlike a VAA it names no guardian set, so it is checked against
/// whichever set is live when it arrives.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignedObservation {
    pub message_id: MessageId,
    /// The guardian claiming to have produced `signature`.
    pub claimed_address: GuardianAddress,
    /// Digest of the observed message. Signed as is.
    pub hash: [u8; 32],
    #[serde(with = "crate::serde_array")]
    pub signature: [u8; 65],
    /// Hash of the source transaction, encoding is chain specific.
    pub tx_hash: Vec<u8>,
}
