use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("private key is not a valid secp256k1 scalar")]
    InvalidPrivateKey,

    #[error("signature r/s components are malformed")]
    MalformedSignature,

    #[error("invalid recovery id {0}")]
    InvalidRecoveryId(u8),

    #[error("public key recovery failed")]
    RecoveryFailed,

    #[error("signing failed")]
    SigningFailed,
}
