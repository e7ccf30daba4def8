//! Step-count challenge escrow.
//!
//! A sponsor funds an escrow for a challenger who must reach a daily step
//! goal on a required number of days. A server authority attests progress by
//! signing messages; the challenger submits them with the day data. The
//! escrow then pays out on success, on failure, on a voluntary withdrawal, or
//! on a forced close after the grace period.
//!
//! - [`params`]: construction parameters, validation, TOML loading
//! - [`challenge`]: the aggregate and its operations
//! - [`ledger`]: per-day bookkeeping and the success/failure rules
//! - [`distribution`]: payout plans for each outcome
//! - [`asset`]: the transfer port over native currency or a token
//! - [`auth`]: signature authentication and replay protection
//! - [`clock_gate`]: time windows

pub mod asset;
pub mod auth;
pub mod challenge;
pub mod clock_gate;
pub mod distribution;
pub mod error;
pub mod events;
pub mod ledger;
pub mod params;
pub mod state;

pub use asset::{AssetPort, NativeAsset, TokenAsset};
pub use auth::{MessageId, SignatureAuthenticator};
pub use challenge::{Challenge, ChallengeSummary, DestroyError, DestroyReceipt};
pub use clock_gate::{ClockGate, Window, GRACE_PERIOD_SECS};
pub use distribution::{Payout, PayoutRole, Settlement};
pub use error::{ArithmeticError, ChallengeError, ErrorKind, TransferError, ValidationError};
pub use events::ChallengeEvent;
pub use ledger::{DayProgress, ProgressLedger, Verdict};
pub use params::{AwardReceiver, ChallengeParams, ChallengeTerms, ConfigError, GiveUpPolicy};
pub use state::{ChallengeState, StateTag};
