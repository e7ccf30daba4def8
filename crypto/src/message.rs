//! The prefixed signed-message encoding.
//!
//! The server authority signs `keccak256(PREFIX || decimal(len) || message)`
//! where `len` is the message's byte length written in ASCII decimal. The
//! engine must rebuild exactly these bytes before recovering the signer.

use crate::hash::keccak256_multi;

/// Fixed prefix of every authenticated message.
pub const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// The exact byte sequence that gets hashed and signed.
pub fn prefixed_message(message: &str) -> Vec<u8> {
    let len = message.len().to_string();
    let mut out = Vec::with_capacity(SIGNED_MESSAGE_PREFIX.len() + len.len() + message.len());
    out.extend_from_slice(SIGNED_MESSAGE_PREFIX);
    out.extend_from_slice(len.as_bytes());
    out.extend_from_slice(message.as_bytes());
    out
}

/// Digest of the prefixed encoding: what the authority's key actually signs.
pub fn message_digest(message: &str) -> [u8; 32] {
    let len = message.len().to_string();
    keccak256_multi(&[SIGNED_MESSAGE_PREFIX, len.as_bytes(), message.as_bytes()])
}
