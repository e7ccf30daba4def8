//! Cryptographic primitives for stepstake.
//!
//! - **secp256k1 ECDSA** with public-key recovery (the server authority's signature scheme)
//! - **Keccak-256** for message digests and address derivation
//! - The prefixed signed-message encoding progress attestations are signed under
//! - Address derivation: last 20 bytes of Keccak-256 over the uncompressed public point

pub mod error;
pub mod hash;
pub mod keys;
pub mod message;
pub mod sign;

pub use error::CryptoError;
pub use hash::{keccak256, keccak256_multi};
pub use keys::{derive_address, generate_keypair, keypair_from_seed, public_from_private};
pub use message::{message_digest, prefixed_message, SIGNED_MESSAGE_PREFIX};
pub use sign::{recover_signer, sign_message};
