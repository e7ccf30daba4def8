//! Lifecycle state.
//!
//! A single tagged state replaces separate finished/success/gave-up flags: the
//! flags are derived, so they cannot drift out of sync with the state.

use serde::{Deserialize, Serialize};
use stepstake_types::{Address, Timestamp};

/// The bare state tag, for queries and events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateTag {
    Processing,
    Success,
    Failed,
    GaveUp,
    Closed,
}

/// Where a challenge is in its lifecycle. Every variant except `Processing` is terminal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChallengeState {
    Processing,
    Success { settled_at: Timestamp },
    Failed { settled_at: Timestamp },
    GaveUp { initiator: Address, settled_at: Timestamp },
    Closed { settled_at: Timestamp },
}

impl ChallengeState {
    pub fn tag(&self) -> StateTag {
        match self {
            Self::Processing => StateTag::Processing,
            Self::Success { .. } => StateTag::Success,
            Self::Failed { .. } => StateTag::Failed,
            Self::GaveUp { .. } => StateTag::GaveUp,
            Self::Closed { .. } => StateTag::Closed,
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Processing)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn has_given_up(&self) -> bool {
        matches!(self, Self::GaveUp { .. })
    }

    pub fn settled_at(&self) -> Option<Timestamp> {
        match self {
            Self::Processing => None,
            Self::Success { settled_at }
            | Self::Failed { settled_at }
            | Self::GaveUp { settled_at, .. }
            | Self::Closed { settled_at } => Some(*settled_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_flags() {
        let at = Timestamp::new(5);
        assert!(!ChallengeState::Processing.is_finished());
        assert!(ChallengeState::Success { settled_at: at }.is_success());
        assert!(ChallengeState::Closed { settled_at: at }.is_finished());
        assert!(!ChallengeState::Failed { settled_at: at }.is_success());
        let gave_up = ChallengeState::GaveUp {
            initiator: Address::new([1; 20]),
            settled_at: at,
        };
        assert!(gave_up.has_given_up());
        assert_eq!(gave_up.tag(), StateTag::GaveUp);
        assert_eq!(gave_up.settled_at(), Some(at));
        assert_eq!(ChallengeState::Processing.settled_at(), None);
    }
}
