//! A deterministic guardian network for tests. The private keys are fixed so signatures and
//! addresses are stable across runs. Never use these keys outside of tests.

use k256::ecdsa::SigningKey;
use serde::Serialize;

use crate::{
    vaa::{Body, Header, Signature},
    GuardianAddress, GuardianSet, MessageId, SignedObservation, Vaa,
};

pub fn default_guardian_keys() -> [SigningKey; 7] {
    [
        [
            93, 217, 189, 224, 168, 81, 157, 93, 238, 38, 143, 8, 182, 94, 69, 77, 232, 199, 238,
            206, 15, 135, 221, 58, 43, 74, 0, 129, 54, 198, 62, 226,
        ],
        [
            150, 48, 135, 223, 194, 186, 243, 139, 177, 8, 126, 32, 210, 57, 42, 28, 29, 102, 196,
            201, 106, 136, 40, 149, 218, 150, 240, 213, 192, 128, 161, 245,
        ],
        [
            121, 51, 199, 93, 237, 227, 62, 220, 128, 129, 195, 4, 190, 163, 254, 12, 212, 224,
            188, 76, 141, 242, 229, 121, 192, 5, 161, 176, 136, 99, 83, 53,
        ],
        [
            224, 180, 4, 114, 215, 161, 184, 12, 218, 96, 20, 141, 154, 242, 46, 230, 167, 165, 54,
            141, 108, 64, 146, 27, 193, 89, 251, 139, 234, 132, 124, 30,
        ],
        [
            69, 1, 17, 179, 19, 47, 56, 47, 255, 219, 143, 89, 115, 54, 242, 209, 163, 131, 225,
            30, 59, 195, 217, 141, 167, 253, 6, 95, 252, 52, 7, 223,
        ],
        [
            181, 3, 165, 125, 15, 200, 155, 56, 157, 204, 105, 221, 203, 149, 215, 175, 220, 228,
            200, 37, 169, 39, 68, 127, 132, 196, 203, 232, 155, 55, 67, 253,
        ],
        [
            72, 81, 175, 107, 23, 108, 178, 66, 32, 53, 14, 117, 233, 33, 114, 102, 68, 89, 83,
            201, 129, 57, 56, 130, 214, 212, 172, 16, 23, 22, 234, 160,
        ],
    ]
    .map(|k| SigningKey::from_slice(&k).unwrap())
}

/// Signs on behalf of one guardian set.
#[derive(Clone, Debug)]
pub struct GuardianKeeper {
    index: u32,
    guardians: Vec<SigningKey>,
}

impl GuardianKeeper {
    /// A keeper for guardian set `index` made of the default guardian keys.
    pub fn new(index: u32) -> GuardianKeeper {
        GuardianKeeper::with_keys(index, default_guardian_keys().to_vec())
    }

    pub fn with_keys(index: u32, guardians: Vec<SigningKey>) -> GuardianKeeper {
        GuardianKeeper { index, guardians }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn addresses(&self) -> Vec<GuardianAddress> {
        self.guardians
            .iter()
            .map(|g| GuardianAddress::from(g.verifying_key()))
            .collect()
    }

    pub fn guardian_set(&self) -> GuardianSet {
        GuardianSet::new(self.index, self.addresses()).unwrap()
    }

    /// Signs `prehash` with the guardian at position `index`, in the wire layout.
    pub fn sign_prehash(&self, index: usize, prehash: &[u8; 32]) -> [u8; 65] {
        let (sig, id) = self.guardians[index]
            .sign_prehash_recoverable(prehash)
            .unwrap();

        let mut raw = [0u8; 65];
        raw[..64].copy_from_slice(&sig.to_bytes());
        raw[64] = id.to_byte();
        raw
    }

    /// One signature per guardian over `body`, in ascending guardian order.
    pub fn sign<P: Serialize>(&self, body: &Body<P>) -> Vec<Signature> {
        let d = body.digest().unwrap();
        (0..self.guardians.len())
            .map(|idx| Signature {
                index: idx as u8,
                signature: self.sign_prehash(idx, &d.secp256k_hash),
            })
            .collect()
    }

    pub fn sign_vaa<P: Serialize>(&self, body: Body<P>) -> Vaa<P> {
        let header = Header {
            version: 1,
            guardian_set_index: self.index,
            signatures: self.sign(&body),
        };

        (header, body).into()
    }

    /// An observation of `hash` signed by the guardian at position `index`.
    pub fn sign_observation(
        &self,
        index: usize,
        message_id: MessageId,
        hash: [u8; 32],
    ) -> SignedObservation {
        SignedObservation {
            message_id,
            claimed_address: GuardianAddress::from(self.guardians[index].verifying_key()),
            hash,
            signature: self.sign_prehash(index, &hash),
            tx_hash: vec![index as u8; 32],
        }
    }
}
