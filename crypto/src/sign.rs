//! Recoverable ECDSA signing over the prefixed message encoding.

use crate::error::CryptoError;
use crate::keys::{derive_address, encode_public};
use crate::message::message_digest;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use stepstake_types::{Address, PrivateKey, RecoverableSignature};

/// Legacy offset some signers add to the recovery id.
const LEGACY_V_OFFSET: u8 = 27;

/// Sign `message` under the prefixed encoding, returning `r || s || v` with `v` in 27/28 form.
pub fn sign_message(message: &str, private_key: &PrivateKey) -> Result<RecoverableSignature, CryptoError> {
    let signing_key =
        SigningKey::from_slice(&private_key.0).map_err(|_| CryptoError::InvalidPrivateKey)?;
    let digest = message_digest(message);
    let (signature, recovery_id) = signing_key
        .sign_prehash_recoverable(&digest)
        .map_err(|_| CryptoError::SigningFailed)?;

    let mut out = [0u8; 65];
    out[..64].copy_from_slice(&signature.to_bytes());
    out[64] = recovery_id.to_byte() + LEGACY_V_OFFSET;
    Ok(RecoverableSignature(out))
}

/// Recover the address that signed `message` under the prefixed encoding.
///
/// Accepts `v` as 0/1 or 27/28. High-S signatures are rejected.
pub fn recover_signer(message: &str, signature: &RecoverableSignature) -> Result<Address, CryptoError> {
    let bytes = signature.as_bytes();
    let sig = Signature::from_slice(&bytes[..64]).map_err(|_| CryptoError::MalformedSignature)?;
    let v = bytes[64];
    let normalized = if v >= LEGACY_V_OFFSET { v - LEGACY_V_OFFSET } else { v };
    let recovery_id = RecoveryId::from_byte(normalized).ok_or(CryptoError::InvalidRecoveryId(v))?;

    let digest = message_digest(message);
    let verifying_key = VerifyingKey::recover_from_prehash(&digest, &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    Ok(derive_address(&encode_public(&verifying_key)))
}
