//! secp256k1 key generation and address derivation.

use crate::error::CryptoError;
use crate::hash::keccak256;
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use stepstake_types::{Address, KeyPair, PrivateKey, PublicKey};

/// Generate a new secp256k1 key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::random(&mut OsRng);
    keypair_from_signing_key(&signing_key)
}

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> Result<PublicKey, CryptoError> {
    let signing_key =
        SigningKey::from_slice(&private.0).map_err(|_| CryptoError::InvalidPrivateKey)?;
    Ok(encode_public(signing_key.verifying_key()))
}

/// Derive a key pair from a 32-byte seed (deterministic).
///
/// Fails when the seed is zero or not below the curve order.
pub fn keypair_from_seed(seed: &[u8; 32]) -> Result<KeyPair, CryptoError> {
    let signing_key = SigningKey::from_slice(seed).map_err(|_| CryptoError::InvalidPrivateKey)?;
    Ok(keypair_from_signing_key(&signing_key))
}

/// The account address controlled by a public key.
pub fn derive_address(public: &PublicKey) -> Address {
    // Skip the 0x04 SEC1 tag; hash the raw x || y coordinates.
    let digest = keccak256(&public.0[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest[12..]);
    Address::new(bytes)
}

pub(crate) fn encode_public(verifying_key: &VerifyingKey) -> PublicKey {
    let point = verifying_key.to_encoded_point(false);
    let mut bytes = [0u8; 65];
    bytes.copy_from_slice(point.as_bytes());
    PublicKey(bytes)
}

fn keypair_from_signing_key(signing_key: &SigningKey) -> KeyPair {
    let mut private = [0u8; 32];
    private.copy_from_slice(&signing_key.to_bytes());
    KeyPair {
        public: encode_public(signing_key.verifying_key()),
        private: PrivateKey(private),
    }
}
