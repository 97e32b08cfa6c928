use k256::{
    ecdsa::{RecoveryId, Signature, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
};
use sha3::{Digest, Keccak256};

use crate::GuardianAddress;

impl From<&VerifyingKey> for GuardianAddress {
    fn from(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);

        // Skip the 0x04 SEC1 tag, the address is the tail of the hash of x || y.
        let hash = Keccak256::digest(&point.as_bytes()[1..]);
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&hash[12..]);
        GuardianAddress(addr)
    }
}

/// Recovers the address of the guardian that produced `signature` over `prehash`.
///
/// Signatures have the following byte layout:
/// ```markdown
/// 0  .. 64: Signature   (ECDSA r || s)
/// 64 .. 65: Recovery ID (ECDSA)
/// ```
///
/// `prehash` is handed to the curve as is. For VAAs this is the secp256k hash of the body, see
/// [`Digest`](crate::vaa::Digest).
pub fn recover_address(
    prehash: &[u8; 32],
    signature: &[u8; 65],
) -> Result<GuardianAddress, k256::ecdsa::Error> {
    let sig = Signature::from_slice(&signature[..64])?;
    let id = RecoveryId::from_byte(signature[64]).ok_or_else(k256::ecdsa::Error::new)?;
    let key = VerifyingKey::recover_from_prehash(prehash, &sig, id)?;

    Ok(GuardianAddress::from(&key))
}
