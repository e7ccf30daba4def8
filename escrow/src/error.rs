//! Escrow errors.
//!
//! Every failure aborts the whole triggering operation. [`ErrorKind`] groups the
//! variants into the categories callers branch on.

use crate::clock_gate::Window;
use crate::state::StateTag;
use stepstake_crypto::CryptoError;
use stepstake_types::{Address, Asset, Timestamp};
use thiserror::Error;

pub use stepstake_types::TransferError;

/// Malformed construction parameters or operation inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{role} address must not be zero")]
    ZeroAddress { role: &'static str },

    #[error("{receivers} award receivers but {approvals} approvals")]
    LengthMismatch { receivers: usize, approvals: usize },

    #[error("award receiver at position {0} has a zero approval")]
    ZeroApproval(usize),

    #[error("receiver {0} is listed twice in the same payout list")]
    DuplicateReceiver(Address),

    #[error("split index {index} is beyond the {len} award receivers")]
    SplitIndexOutOfRange { index: usize, len: usize },

    #[error("required days must be positive")]
    ZeroDayRequired,

    #[error("goal must be positive")]
    ZeroGoal,

    #[error("duration {duration} is shorter than the {day_required} required days")]
    DurationTooShort { duration: u64, day_required: u64 },

    #[error("start time {start} must precede end time {end}")]
    InvalidWindow { start: Timestamp, end: Timestamp },

    #[error("declared deposit {declared} but the escrow holds {held}")]
    DepositMismatch { declared: u128, held: u128 },

    #[error("gas fee {gas_fee} exceeds the deposit {deposit}")]
    GasFeeExceedsDeposit { gas_fee: u128, deposit: u128 },

    #[error("{outcome} payouts total {total} but the deposit is {deposit}")]
    PayoutSumMismatch {
        outcome: &'static str,
        total: u128,
        deposit: u128,
    },

    #[error("configured amounts overflow")]
    AmountOverflow,

    #[error("port serves {actual} but the challenge holds {expected}")]
    AssetMismatch { expected: Asset, actual: Asset },

    #[error("progress batch is empty")]
    EmptyBatch,
}

/// Checked arithmetic refused to produce a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("arithmetic underflow")]
    Underflow,

    #[error("division by zero")]
    DivisionByZero,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChallengeError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("{caller} may not {action}")]
    Unauthorized {
        caller: Address,
        action: &'static str,
    },

    #[error("message was signed by {recovered}, expected {expected}")]
    SignatureMismatch { recovered: Address, expected: Address },

    #[error("unusable signature: {0}")]
    BadSignature(#[from] CryptoError),

    #[error("message has already been used")]
    Replay,

    #[error("{action} is only allowed {window} (now {now})")]
    OutsideWindow {
        action: &'static str,
        window: Window,
        now: Timestamp,
    },

    #[error("challenge is already finished ({0:?})")]
    AlreadyFinished(StateTag),

    #[error("challenge already succeeded")]
    AlreadySucceeded,

    #[error("give up is not enabled for this challenge")]
    GiveUpDisabled,

    #[error("day {0} already has recorded steps")]
    DuplicateDay(u64),

    #[error("payout arithmetic failed: {0}")]
    Arithmetic(#[from] ArithmeticError),

    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

/// Coarse error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authorization,
    Replay,
    Timing,
    State,
    DuplicateData,
    Arithmetic,
    Transfer,
}

impl ChallengeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unauthorized { .. } | Self::SignatureMismatch { .. } | Self::BadSignature(_) => {
                ErrorKind::Authorization
            }
            Self::Replay => ErrorKind::Replay,
            Self::OutsideWindow { .. } => ErrorKind::Timing,
            Self::AlreadyFinished(_) | Self::AlreadySucceeded | Self::GiveUpDisabled => {
                ErrorKind::State
            }
            Self::DuplicateDay(_) => ErrorKind::DuplicateData,
            Self::Arithmetic(_) => ErrorKind::Arithmetic,
            Self::Transfer(_) => ErrorKind::Transfer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_categories() {
        assert_eq!(ChallengeError::Replay.kind(), ErrorKind::Replay);
        assert_eq!(ChallengeError::DuplicateDay(3).kind(), ErrorKind::DuplicateData);
        assert_eq!(
            ChallengeError::from(ArithmeticError::Overflow).kind(),
            ErrorKind::Arithmetic
        );
        assert_eq!(
            ChallengeError::from(CryptoError::MalformedSignature).kind(),
            ErrorKind::Authorization
        );
        assert_eq!(
            ChallengeError::from(ValidationError::EmptyBatch).kind(),
            ErrorKind::Validation
        );
        assert_eq!(ChallengeError::GiveUpDisabled.kind(), ErrorKind::State);
    }

    #[test]
    fn display_carries_values() {
        let err = ChallengeError::DuplicateDay(4);
        assert_eq!(err.to_string(), "day 4 already has recorded steps");
        let err = ChallengeError::from(ValidationError::ZeroApproval(2));
        assert_eq!(
            err.to_string(),
            "invalid input: award receiver at position 2 has a zero approval"
        );
    }
}
