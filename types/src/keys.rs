//! Cryptographic key types for the server authority and test signers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 65-byte uncompressed SEC1 secp256k1 public key (`0x04 || x || y`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; 65]);

/// A 32-byte secp256k1 private key (secret scalar).
///
/// This type intentionally does not implement `Debug`, `Serialize`, or `Clone`
/// to prevent accidental exposure. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

/// A 65-byte recoverable ECDSA signature: `r || s || v`.
///
/// `v` is the recovery id, either raw (0/1) or in the legacy 27/28 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoverableSignature(pub [u8; 65]);

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SigVisitor;

        impl<'de> serde::de::Visitor<'de> for SigVisitor {
            type Value = RecoverableSignature;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "65 bytes")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                let arr: [u8; 65] = v
                    .try_into()
                    .map_err(|_| E::invalid_length(v.len(), &self))?;
                Ok(RecoverableSignature(arr))
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> Result<Self::Value, A::Error> {
                let mut arr = [0u8; 65];
                for (i, byte) in arr.iter_mut().enumerate() {
                    *byte = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &self))?;
                }
                Ok(RecoverableSignature(arr))
            }
        }

        deserializer.deserialize_bytes(SigVisitor)
    }
}

/// A secp256k1 key pair (public + private).
///
/// Use `stepstake_crypto::generate_keypair()` or `stepstake_crypto::keypair_from_seed()`
/// to construct key pairs. This struct is intentionally just data.
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }
}

impl RecoverableSignature {
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The trailing recovery byte as transmitted.
    pub fn v(&self) -> u8 {
        self.0[64]
    }
}
