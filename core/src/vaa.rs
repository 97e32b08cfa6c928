//! VAA's represent a collection of guardian signatures combined with a message and its metadata.
//! A VAA is only trustworthy when a quorum of the guardian set named in its header signed the
//! digest of its body.
//!
//! The types here mirror the Wormhole wire format so that `serde_wormhole` can decode a VAA from
//! the bytes delivered over gossip and re-encode its body to compute the signed digest.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use sha3::Digest as Sha3Digest;

use crate::{Address, Chain};

/// A guardian signature prefixed with the signer's position in the guardian set.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature {
    pub index: u8,
    #[serde(with = "crate::serde_array")]
    pub signature: [u8; 65],
}

impl Default for Signature {
    fn default() -> Self {
        Self {
            index: 0,
            signature: [0; 65],
        }
    }
}

/// The core VAA itself. The generic parameter `P` is the payload, which this crate never
/// interprets; `&serde_wormhole::RawMessage` keeps it as raw bytes.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vaa<P> {
    // Fields are duplicated from `Header` and `Body` rather than flattened, since flattening
    // makes serde treat the struct as a map and the wire format has no field names.
    pub version: u8,
    pub guardian_set_index: u32,
    pub signatures: Vec<Signature>,
    pub timestamp: u32,
    pub nonce: u32,
    pub emitter_chain: Chain,
    pub emitter_address: Address,
    pub sequence: u64,
    pub consistency_level: u8,
    pub payload: P,
}

/// The header for a VAA.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Header {
    pub version: u8,
    pub guardian_set_index: u32,
    pub signatures: Vec<Signature>,
}

/// The body for a VAA. This is the part guardians sign.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Body<P> {
    /// Seconds since UNIX epoch.
    pub timestamp: u32,
    pub nonce: u32,
    pub emitter_chain: Chain,
    pub emitter_address: Address,
    pub sequence: u64,
    pub consistency_level: u8,
    pub payload: P,
}

/// Digest data for the Body.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest {
    /// Keccak256 of the serialized body. This is the hash that identifies a VAA everywhere in
    /// Wormhole.
    pub hash: [u8; 32],

    /// Keccak256 of `hash`. secp256k1 signing hashes its input first, so guardians signing `hash`
    /// actually sign this value and signature recovery has to be fed it.
    pub secp256k_hash: [u8; 32],
}

/// Calculates the digest of an already serialized VAA body.
pub fn digest(body: &[u8]) -> io::Result<Digest> {
    let hash: [u8; 32] = {
        let mut h = sha3::Keccak256::default();
        h.write_all(body)?;
        h.finalize().into()
    };

    Ok(Digest {
        hash,
        secp256k_hash: sha3::Keccak256::digest(hash).into(),
    })
}

impl<P> Vaa<P> {
    pub fn header(&self) -> Header {
        Header {
            version: self.version,
            guardian_set_index: self.guardian_set_index,
            signatures: self.signatures.clone(),
        }
    }

    /// Borrowing view of the signed part of this VAA.
    pub fn body(&self) -> Body<&P> {
        Body {
            timestamp: self.timestamp,
            nonce: self.nonce,
            emitter_chain: self.emitter_chain,
            emitter_address: self.emitter_address,
            sequence: self.sequence,
            consistency_level: self.consistency_level,
            payload: &self.payload,
        }
    }
}

impl<P: Serialize> Vaa<P> {
    pub fn digest(&self) -> Result<Digest, serde_wormhole::Error> {
        self.body().digest()
    }
}

impl<P> From<Vaa<P>> for (Header, Body<P>) {
    fn from(v: Vaa<P>) -> Self {
        (
            Header {
                version: v.version,
                guardian_set_index: v.guardian_set_index,
                signatures: v.signatures,
            },
            Body {
                timestamp: v.timestamp,
                nonce: v.nonce,
                emitter_chain: v.emitter_chain,
                emitter_address: v.emitter_address,
                sequence: v.sequence,
                consistency_level: v.consistency_level,
                payload: v.payload,
            },
        )
    }
}

impl<P> From<(Header, Body<P>)> for Vaa<P> {
    fn from((hdr, body): (Header, Body<P>)) -> Self {
        Vaa {
            version: hdr.version,
            guardian_set_index: hdr.guardian_set_index,
            signatures: hdr.signatures,
            timestamp: body.timestamp,
            nonce: body.nonce,
            emitter_chain: body.emitter_chain,
            emitter_address: body.emitter_address,
            sequence: body.sequence,
            consistency_level: body.consistency_level,
            payload: body.payload,
        }
    }
}

impl<P: Serialize> Body<P> {
    /// Serializes the body to the wire format and hashes it, see [`Digest`].
    pub fn digest(&self) -> Result<Digest, serde_wormhole::Error> {
        let data = serde_wormhole::to_vec(self)?;

        // Hashing a Vec can't fail.
        Ok(digest(&data).unwrap_or_default())
    }
}

#[cfg(test)]
mod test {
    use serde_wormhole::RawMessage;

    use super::*;

    fn body() -> Body<&'static str> {
        Body {
            timestamp: 1_656_354_705,
            nonce: 0,
            emitter_chain: Chain::Ethereum,
            emitter_address: Address(hex_literal::hex!(
                "000000000000000000000000f19a2a01b70519f67adb309a994ec8c69a967e8b"
            )),
            sequence: 0,
            consistency_level: 1,
            payload: "From: evm0\\nMsg: Hello World!",
        }
    }

    #[test]
    fn digest_from_raw_parts() {
        let body = body();
        let d1 = body.digest().unwrap();

        let data = serde_wormhole::to_vec(&body).unwrap();
        let d2 = digest(&data).unwrap();
        assert_eq!(d1, d2);

        // Deferring payload parsing must not change what was signed.
        let partial = serde_wormhole::from_slice::<Body<&RawMessage>>(&data).unwrap();
        assert_eq!(d1, partial.digest().unwrap());
    }

    #[test]
    fn stable_digest() {
        // Governance body registering an Ethereum emitter, as signed by the mainnet guardians.
        let data = hex_literal::hex!(
            "000000010000000100010000000000000000000000000000000000000000000000000000000000000004"
            "0000000003b456b800000000000000000000000000000000000000000000546f6b656e42726964676501"
            "000000020000000000000000000000000290fb167208af455bb137780163b7b7a9a10c16"
        );
        let expected = hex_literal::hex!(
            "05d1fcc531746c7efd7feea20a81d2799f777f302b8a6a6424b81209dc3f511f"
        );

        assert_eq!(expected, digest(&data).unwrap().secp256k_hash);
    }

    #[test]
    fn split_and_join() {
        let vaa = Vaa {
            version: 1,
            guardian_set_index: 3,
            signatures: vec![Signature {
                index: 2,
                signature: [5; 65],
            }],
            timestamp: 10,
            nonce: 11,
            emitter_chain: Chain::Solana,
            emitter_address: Address([4; 32]),
            sequence: 12,
            consistency_level: 32,
            payload: vec![1u8, 2, 3],
        };

        assert_eq!(vaa.header().guardian_set_index, 3);
        assert_eq!(vaa.body().sequence, 12);

        let (header, body): (Header, Body<Vec<u8>>) = vaa.clone().into();
        assert_eq!(vaa.digest().unwrap(), body.digest().unwrap());
        assert_eq!(vaa, Vaa::from((header, body)));
    }

    #[test]
    fn wire_round_trip() {
        let payload = [0xde, 0xad, 0xbe, 0xef];
        let vaa = Vaa {
            version: 1,
            guardian_set_index: 0,
            signatures: vec![Signature {
                index: 0,
                signature: [9; 65],
            }],
            timestamp: 1,
            nonce: 2,
            emitter_chain: Chain::Ethereum,
            emitter_address: Address([1; 32]),
            sequence: 3,
            consistency_level: 1,
            payload: RawMessage::new(&payload),
        };

        let buf = serde_wormhole::to_vec(&vaa).unwrap();
        // version + index + count + one signature + fixed body fields + payload.
        assert_eq!(1 + 4 + 1 + 66 + 51 + payload.len(), buf.len());
        assert_eq!(&payload, &buf[buf.len() - 4..]);
        assert_eq!(vaa, serde_wormhole::from_slice(&buf).unwrap());
    }
}
