//! The challenge aggregate: one escrow instance and every operation on it.
//!
//! Each mutating operation runs against a checkpoint. Guards are checked
//! first, then state and replay-guard effects are applied, and only then is
//! the asset port asked to move value. If anything fails the checkpoint is
//! restored, so a failed call leaves no trace in the aggregate, and the port
//! applies its batch all-or-nothing so none is left on the ledger either.

use crate::asset::AssetPort;
use crate::auth::SignatureAuthenticator;
use crate::clock_gate::Window;
use crate::distribution::{
    failure_settlement, give_up_settlement, success_settlement, Payout, PayoutRole, Settlement,
};
use crate::error::{ArithmeticError, ChallengeError, TransferError, ValidationError};
use crate::events::ChallengeEvent;
use crate::ledger::{DayProgress, ProgressLedger, Verdict};
use crate::params::{ChallengeParams, ChallengeTerms, GiveUpPolicy};
use crate::state::{ChallengeState, StateTag};
use serde::Serialize;
use stepstake_types::{Address, Amount, Asset, Clock, RecoverableSignature, Timestamp};
use thiserror::Error;

/// A single step-count challenge escrow.
#[derive(Clone, Debug)]
pub struct Challenge {
    address: Address,
    terms: ChallengeTerms,
    auth: SignatureAuthenticator,
    ledger: ProgressLedger,
    state: ChallengeState,
    events: Vec<ChallengeEvent>,
}

/// `destroy` failed; the challenge is handed back untouched.
#[derive(Debug, Error)]
#[error("cannot destroy challenge {}: {reason}", .challenge.address())]
pub struct DestroyError {
    pub challenge: Box<Challenge>,
    #[source]
    pub reason: ChallengeError,
}

/// What a successful `destroy` moved and the final event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DestroyReceipt {
    pub payouts: Vec<Payout>,
    pub events: Vec<ChallengeEvent>,
}

/// A read-only snapshot for display or audit export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChallengeSummary {
    pub address: Address,
    pub sponsor: Address,
    pub challenger: Address,
    pub server: Address,
    pub asset: Asset,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub duration: u64,
    pub day_required: u64,
    pub goal: u64,
    pub deposit: Amount,
    pub total_reward: Amount,
    pub give_up: GiveUpPolicy,
    pub sequence: u64,
    pub current_status: u64,
    pub days_remaining: u64,
    pub state: StateTag,
    pub settled_at: Option<Timestamp>,
    pub consumed_messages: usize,
}

impl Challenge {
    /// Validate `params` against what `address` holds on `port` and open the
    /// challenge, paying the gas stipend to the challenger.
    pub fn create(
        address: Address,
        params: &ChallengeParams,
        port: &mut dyn AssetPort,
    ) -> Result<Self, ChallengeError> {
        if address.is_zero() {
            return Err(ValidationError::ZeroAddress { role: "escrow" }.into());
        }
        let actual = port.asset();
        if actual != params.asset {
            return Err(ValidationError::AssetMismatch {
                expected: params.asset,
                actual,
            }
            .into());
        }

        let held = port.balance_of(&address);
        let terms = params.validate(held)?;

        let mut challenge = Self {
            address,
            auth: SignatureAuthenticator::new(terms.server),
            ledger: ProgressLedger::new(terms.goal, terms.day_required, terms.duration),
            state: ChallengeState::Processing,
            events: Vec::new(),
            terms,
        };

        let mut stipend = Settlement::new();
        stipend.push(challenge.terms.challenger, challenge.terms.gas_fee, PayoutRole::Challenger);
        challenge.pay(port, stipend)?;

        tracing::info!(
            challenge = %address,
            sponsor = %challenge.terms.sponsor,
            challenger = %challenge.terms.challenger,
            deposit = %challenge.terms.deposit,
            day_required = challenge.terms.day_required,
            duration = challenge.terms.duration,
            "challenge created"
        );
        Ok(challenge)
    }

    /// Submit a batch of attested days.
    ///
    /// Only the challenger may submit, only in the reporting window, and only
    /// with a fresh message signed by the server authority. Returns the state
    /// after the batch; reaching the success or failure rule settles at once.
    pub fn send_daily_result(
        &mut self,
        caller: &Address,
        clock: &dyn Clock,
        port: &mut dyn AssetPort,
        batch: &[DayProgress],
        message: &str,
        signature: &RecoverableSignature,
    ) -> Result<StateTag, ChallengeError> {
        let now = clock.now();
        self.transact("send daily result", |this| {
            this.ensure_asset(port)?;
            this.ensure_processing()?;
            this.terms.gate.require(Window::Reporting, now, "send daily result")?;
            if caller != &this.terms.challenger {
                return Err(ChallengeError::Unauthorized {
                    caller: *caller,
                    action: "send daily result",
                });
            }
            this.auth.verify(message, signature)?;
            this.auth.check_and_consume(message)?;

            let verdict = this.ledger.record_batch(batch)?;
            this.events.push(ChallengeEvent::DailyResult {
                current_status: this.ledger.current_status(),
                sequence: this.ledger.sequence(),
            });
            tracing::debug!(
                challenge = %this.address,
                days = batch.len(),
                current_status = this.ledger.current_status(),
                sequence = this.ledger.sequence(),
                "daily result accepted"
            );

            match verdict {
                Verdict::Pending => {}
                Verdict::Succeeded => {
                    let settlement = success_settlement(&this.terms);
                    this.settle(port, ChallengeState::Success { settled_at: now }, settlement)?;
                }
                Verdict::Failed => {
                    let settlement = failure_settlement(&this.terms);
                    this.settle(port, ChallengeState::Failed { settled_at: now }, settlement)?;
                }
            }
            Ok(this.state.tag())
        })
    }

    /// Voluntary withdrawal by the sponsor or challenger during the challenge window.
    pub fn give_up(
        &mut self,
        caller: &Address,
        clock: &dyn Clock,
        port: &mut dyn AssetPort,
    ) -> Result<(), ChallengeError> {
        let now = clock.now();
        self.transact("give up", |this| {
            this.ensure_asset(port)?;
            if !this.terms.give_up.allows_give_up() {
                return Err(ChallengeError::GiveUpDisabled);
            }
            this.ensure_processing()?;
            this.terms.gate.require(Window::Challenge, now, "give up")?;
            this.ensure_party(caller, "give up")?;

            let settlement = give_up_settlement(&this.terms, this.ledger.current_status())?;
            this.events.push(ChallengeEvent::GiveUp { initiator: *caller });
            this.settle(
                port,
                ChallengeState::GaveUp {
                    initiator: *caller,
                    settled_at: now,
                },
                settlement,
            )
        })
    }

    /// Forced close once the grace period is over. Pays out as a failure.
    pub fn close_challenge(
        &mut self,
        caller: &Address,
        clock: &dyn Clock,
        port: &mut dyn AssetPort,
    ) -> Result<(), ChallengeError> {
        let now = clock.now();
        self.transact("close challenge", |this| {
            this.ensure_asset(port)?;
            this.terms.gate.require(Window::AfterGrace, now, "close challenge")?;
            if this.state.is_success() {
                return Err(ChallengeError::AlreadySucceeded);
            }
            this.ensure_processing()?;
            this.ensure_party(caller, "close challenge")?;

            this.events.push(ChallengeEvent::CloseChallenge { success: false });
            let settlement = failure_settlement(&this.terms);
            this.settle(port, ChallengeState::Closed { settled_at: now }, settlement)
        })
    }

    /// Tear the challenge down, in any state.
    ///
    /// Balance above the reserved failure fee goes to the server authority and
    /// whatever remains goes to the sponsor. On failure the challenge is
    /// returned inside the error.
    pub fn destroy(
        mut self,
        caller: &Address,
        port: &mut dyn AssetPort,
    ) -> Result<DestroyReceipt, DestroyError> {
        match self.sweep(caller, port) {
            Ok(payouts) => {
                tracing::info!(challenge = %self.address, sponsor = %self.terms.sponsor, "challenge destroyed");
                Ok(DestroyReceipt {
                    payouts,
                    events: self.events,
                })
            }
            Err(reason) => {
                tracing::warn!(challenge = %self.address, error = %reason, "destroy rejected");
                Err(DestroyError {
                    challenge: Box::new(self),
                    reason,
                })
            }
        }
    }

    fn sweep(&mut self, caller: &Address, port: &mut dyn AssetPort) -> Result<Vec<Payout>, ChallengeError> {
        self.transact("destroy", |this| {
            this.ensure_asset(port)?;
            if caller != &this.terms.server && caller != &this.terms.sponsor {
                return Err(ChallengeError::Unauthorized {
                    caller: *caller,
                    action: "destroy",
                });
            }

            let balance = port.balance_of(&this.address);
            let excess = balance.saturating_sub(this.terms.server_failure_fee);
            let residual = balance
                .checked_sub(excess)
                .ok_or(ArithmeticError::Underflow)?;

            let mut settlement = Settlement::new();
            settlement.push(this.terms.server, excess, PayoutRole::Server);
            settlement.push(this.terms.sponsor, residual, PayoutRole::Sponsor);
            let payouts = settlement.payouts().to_vec();
            this.pay(port, settlement)?;
            this.events.push(ChallengeEvent::Destroyed {
                sponsor: this.terms.sponsor,
            });
            Ok(payouts)
        })
    }

    /// Run `op` against a checkpoint, restoring it if `op` fails.
    fn transact<T>(
        &mut self,
        action: &'static str,
        op: impl FnOnce(&mut Self) -> Result<T, ChallengeError>,
    ) -> Result<T, ChallengeError> {
        let checkpoint = self.clone();
        match op(self) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(challenge = %self.address, action, error = %e, "operation rolled back");
                *self = checkpoint;
                Err(e)
            }
        }
    }

    fn ensure_asset(&self, port: &dyn AssetPort) -> Result<(), ChallengeError> {
        let actual = port.asset();
        if actual != self.terms.asset {
            return Err(ValidationError::AssetMismatch {
                expected: self.terms.asset,
                actual,
            }
            .into());
        }
        Ok(())
    }

    fn ensure_processing(&self) -> Result<(), ChallengeError> {
        if self.state.is_finished() {
            return Err(ChallengeError::AlreadyFinished(self.state.tag()));
        }
        Ok(())
    }

    fn ensure_party(&self, caller: &Address, action: &'static str) -> Result<(), ChallengeError> {
        if caller != &self.terms.sponsor && caller != &self.terms.challenger {
            return Err(ChallengeError::Unauthorized {
                caller: *caller,
                action,
            });
        }
        Ok(())
    }

    /// Enter a terminal state, then pay out.
    fn settle(
        &mut self,
        port: &mut dyn AssetPort,
        next: ChallengeState,
        settlement: Settlement,
    ) -> Result<(), ChallengeError> {
        self.state = next;
        let tag = self.state.tag();
        self.events.push(ChallengeEvent::StateChanged { state: tag });
        self.pay(port, settlement)?;
        tracing::info!(challenge = %self.address, state = ?tag, "challenge settled");
        Ok(())
    }

    /// Check the escrow can cover `settlement`, move it, and log every line.
    fn pay(&mut self, port: &mut dyn AssetPort, settlement: Settlement) -> Result<(), ChallengeError> {
        if settlement.is_empty() {
            return Ok(());
        }
        let needed = settlement.total()?;
        let available = port.balance_of(&self.address);
        if available < needed {
            return Err(TransferError::InsufficientBalance {
                needed: needed.raw(),
                available: available.raw(),
            }
            .into());
        }

        port.transfer_all(&self.address, settlement.payouts())?;
        for payout in settlement.into_payouts() {
            tracing::info!(
                challenge = %self.address,
                to = %payout.to,
                amount = %payout.amount,
                role = ?payout.role,
                "fund transfer"
            );
            self.events.push(ChallengeEvent::FundTransfer {
                to: payout.to,
                amount: payout.amount,
                role: payout.role,
            });
        }
        Ok(())
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn terms(&self) -> &ChallengeTerms {
        &self.terms
    }

    /// `(current_status, days_remaining)`.
    pub fn status(&self) -> (u64, u64) {
        (self.ledger.current_status(), self.ledger.days_remaining())
    }

    pub fn sequence(&self) -> u64 {
        self.ledger.sequence()
    }

    /// Every accepted day in submission order.
    pub fn history(&self) -> &[DayProgress] {
        self.ledger.history()
    }

    pub fn step_on(&self, day: u64) -> Option<u64> {
        self.ledger.step_on(day)
    }

    pub fn state(&self) -> StateTag {
        self.state.tag()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_success(&self) -> bool {
        self.state.is_success()
    }

    pub fn has_given_up(&self) -> bool {
        self.state.has_given_up()
    }

    /// Value the escrow currently holds on `port`.
    pub fn balance(&self, port: &dyn AssetPort) -> Amount {
        port.balance_of(&self.address)
    }

    pub fn approval_success_of(&self, receiver: &Address) -> Option<Amount> {
        self.terms.approval_success_of(receiver)
    }

    pub fn approval_fail_of(&self, receiver: &Address) -> Option<Amount> {
        self.terms.approval_fail_of(receiver)
    }

    pub fn is_message_consumed(&self, message: &str) -> bool {
        self.auth.is_consumed(message)
    }

    /// Events not yet drained.
    pub fn events(&self) -> &[ChallengeEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<ChallengeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn summary(&self) -> ChallengeSummary {
        let (current_status, days_remaining) = self.status();
        ChallengeSummary {
            address: self.address,
            sponsor: self.terms.sponsor,
            challenger: self.terms.challenger,
            server: self.terms.server,
            asset: self.terms.asset,
            start_time: self.terms.gate.start(),
            end_time: self.terms.gate.end(),
            duration: self.terms.duration,
            day_required: self.terms.day_required,
            goal: self.terms.goal,
            deposit: self.terms.deposit,
            total_reward: self.terms.total_reward,
            give_up: self.terms.give_up,
            sequence: self.ledger.sequence(),
            current_status,
            days_remaining,
            state: self.state.tag(),
            settled_at: self.state.settled_at(),
            consumed_messages: self.auth.consumed_count(),
        }
    }
}
