//! Progress-message authentication and replay protection.

use crate::error::ChallengeError;
use std::collections::HashSet;
use stepstake_crypto::{message_digest, recover_signer};
use stepstake_types::{Address, RecoverableSignature};

/// Identifies a consumed message: the digest of its prefixed encoding.
pub type MessageId = [u8; 32];

/// Checks that progress messages come from the one configured authority and
/// that no message is accepted twice.
///
/// The consumed set only grows. Rolling back a failed operation is the
/// caller's job (the challenge restores a checkpoint).
#[derive(Clone, Debug)]
pub struct SignatureAuthenticator {
    authority: Address,
    consumed: HashSet<MessageId>,
}

impl SignatureAuthenticator {
    pub fn new(authority: Address) -> Self {
        Self {
            authority,
            consumed: HashSet::new(),
        }
    }

    /// Recover the address that signed `message`.
    pub fn authenticate(
        &self,
        message: &str,
        signature: &RecoverableSignature,
    ) -> Result<Address, ChallengeError> {
        Ok(recover_signer(message, signature)?)
    }

    /// Recover the signer and require it to be the configured authority.
    pub fn verify(
        &self,
        message: &str,
        signature: &RecoverableSignature,
    ) -> Result<(), ChallengeError> {
        let recovered = self.authenticate(message, signature)?;
        if recovered != self.authority {
            return Err(ChallengeError::SignatureMismatch {
                recovered,
                expected: self.authority,
            });
        }
        Ok(())
    }

    /// Mark `message` consumed, failing with `Replay` if it already was.
    pub fn check_and_consume(&mut self, message: &str) -> Result<MessageId, ChallengeError> {
        let id = message_digest(message);
        if !self.consumed.insert(id) {
            return Err(ChallengeError::Replay);
        }
        Ok(id)
    }

    pub fn is_consumed(&self, message: &str) -> bool {
        self.consumed.contains(&message_digest(message))
    }

    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }
}
