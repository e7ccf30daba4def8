//! Per-day progress bookkeeping and outcome evaluation.

use crate::error::{ArithmeticError, ChallengeError, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One attested day: the day index and the steps reported for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgress {
    pub day: u64,
    pub steps: u64,
}

impl DayProgress {
    pub fn new(day: u64, steps: u64) -> Self {
        Self { day, steps }
    }
}

/// What the counters say after a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pending,
    Succeeded,
    Failed,
}

/// Step counts per day, in submission order, plus the two derived counters.
///
/// At most one entry per distinct day. Once `sequence` passes `duration` the
/// failure rule fires, so a challenge stops accepting days shortly after.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressLedger {
    goal: u64,
    day_required: u64,
    duration: u64,
    step_on: BTreeMap<u64, u64>,
    history: Vec<DayProgress>,
    sequence: u64,
    current_status: u64,
}

impl ProgressLedger {
    pub fn new(goal: u64, day_required: u64, duration: u64) -> Self {
        Self {
            goal,
            day_required,
            duration,
            step_on: BTreeMap::new(),
            history: Vec::new(),
            sequence: 0,
            current_status: 0,
        }
    }

    /// Record one day. Same rules as a one-entry batch.
    pub fn record_day(&mut self, day: u64, steps: u64) -> Result<Verdict, ChallengeError> {
        self.record_batch(&[DayProgress::new(day, steps)])
    }

    /// Record a batch in order, then evaluate the outcome once.
    ///
    /// A day already on record (or repeated within the batch) rejects the
    /// whole batch before anything is written.
    pub fn record_batch(&mut self, batch: &[DayProgress]) -> Result<Verdict, ChallengeError> {
        if batch.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }
        let mut seen = HashSet::with_capacity(batch.len());
        for entry in batch {
            if self.step_on.contains_key(&entry.day) || !seen.insert(entry.day) {
                return Err(ChallengeError::DuplicateDay(entry.day));
            }
        }
        let sequence = self
            .sequence
            .checked_add(batch.len() as u64)
            .ok_or(ArithmeticError::Overflow)?;

        for entry in batch {
            self.step_on.insert(entry.day, entry.steps);
            self.history.push(*entry);
            if entry.steps >= self.goal && self.current_status < self.day_required {
                self.current_status += 1;
            }
        }
        self.sequence = sequence;

        Ok(self.evaluate()?)
    }

    /// Failed once more days were missed than the slack allows; succeeded once
    /// enough qualifying days are in; pending otherwise.
    pub fn evaluate(&self) -> Result<Verdict, ArithmeticError> {
        let slack = self
            .duration
            .checked_sub(self.day_required)
            .ok_or(ArithmeticError::Underflow)?;
        let missed = self
            .sequence
            .checked_sub(self.current_status)
            .ok_or(ArithmeticError::Underflow)?;

        if missed > slack {
            Ok(Verdict::Failed)
        } else if self.current_status >= self.day_required {
            Ok(Verdict::Succeeded)
        } else {
            Ok(Verdict::Pending)
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn current_status(&self) -> u64 {
        self.current_status
    }

    /// Qualifying days still needed.
    pub fn days_remaining(&self) -> u64 {
        self.day_required.saturating_sub(self.current_status)
    }

    pub fn step_on(&self, day: u64) -> Option<u64> {
        self.step_on.get(&day).copied()
    }

    /// Every accepted entry in submission order.
    pub fn history(&self) -> &[DayProgress] {
        &self.history
    }
}
