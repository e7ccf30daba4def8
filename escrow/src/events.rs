//! Audit events emitted by a challenge.

use crate::distribution::PayoutRole;
use crate::state::StateTag;
use serde::{Deserialize, Serialize};
use stepstake_types::{Address, Amount};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChallengeEvent {
    /// A progress batch was accepted.
    DailyResult { current_status: u64, sequence: u64 },
    /// Value left the escrow.
    FundTransfer {
        to: Address,
        amount: Amount,
        role: PayoutRole,
    },
    GiveUp { initiator: Address },
    /// A forced close after the grace period; `success` is always false today.
    CloseChallenge { success: bool },
    StateChanged { state: StateTag },
    Destroyed { sponsor: Address },
}
