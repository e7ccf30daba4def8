//! Time-window predicates derived from a challenge's start and end times.

use crate::error::ChallengeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use stepstake_types::{Timestamp, DAY_SECS};

/// Late reports and forced close are governed by this window after the end time.
pub const GRACE_PERIOD_SECS: u64 = 2 * DAY_SECS;

/// A named window an operation must be invoked in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Window {
    /// `start <= now <= end`
    Challenge,
    /// `start <= now <= end + grace`
    Reporting,
    /// `now > end + grace`
    AfterGrace,
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Challenge => write!(f, "between the start and end time"),
            Self::Reporting => write!(f, "between the start time and the end of the grace period"),
            Self::AfterGrace => write!(f, "after the grace period"),
        }
    }
}

/// Pure predicates over `(now, start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockGate {
    start: Timestamp,
    end: Timestamp,
}

impl ClockGate {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn grace_end(&self) -> Timestamp {
        self.end.saturating_add_secs(GRACE_PERIOD_SECS)
    }

    pub fn has_started(&self, now: Timestamp) -> bool {
        now >= self.start
    }

    pub fn within_challenge(&self, now: Timestamp) -> bool {
        self.start <= now && now <= self.end
    }

    pub fn within_grace_period(&self, now: Timestamp) -> bool {
        now <= self.grace_end()
    }

    pub fn past_grace_period(&self, now: Timestamp) -> bool {
        now > self.grace_end()
    }

    pub fn contains(&self, window: Window, now: Timestamp) -> bool {
        match window {
            Window::Challenge => self.within_challenge(now),
            Window::Reporting => self.has_started(now) && self.within_grace_period(now),
            Window::AfterGrace => self.past_grace_period(now),
        }
    }

    /// Fail with `OutsideWindow` unless `now` is in `window`.
    pub fn require(
        &self,
        window: Window,
        now: Timestamp,
        action: &'static str,
    ) -> Result<(), ChallengeError> {
        if self.contains(window, now) {
            Ok(())
        } else {
            Err(ChallengeError::OutsideWindow { action, window, now })
        }
    }
}
