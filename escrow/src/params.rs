//! Construction parameters, their validation, and TOML loading.

use crate::clock_gate::ClockGate;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use stepstake_types::{Address, Amount, Asset, Timestamp};
use thiserror::Error;

/// What happens to the pool when the sponsor or challenger gives up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiveUpPolicy {
    /// Giving up is not allowed.
    #[default]
    Disabled,
    /// The whole withdrawable amount returns to the sponsor.
    AllToSponsor,
    /// Receivers are paid for the share of required days already met.
    Proportional,
}

impl GiveUpPolicy {
    pub fn allows_give_up(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// One entry of a payout list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardReceiver {
    pub address: Address,
    pub amount: Amount,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("invalid challenge config: {0}")]
    Parse(String),

    #[error("cannot serialize challenge config: {0}")]
    Serialize(String),
}

/// Everything needed to open a challenge.
///
/// Can be loaded from TOML via [`ChallengeParams::from_toml_file`] or built
/// programmatically. Nothing is checked until [`ChallengeParams::validate`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeParams {
    pub sponsor: Address,
    pub challenger: Address,
    /// Signs progress attestations and collects the server fees.
    pub server: Address,

    #[serde(default = "default_asset")]
    pub asset: Asset,

    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Total days the challenge runs.
    pub duration: u64,
    /// Days the challenger must meet the goal.
    pub day_required: u64,
    /// Minimum steps for a qualifying day.
    pub goal: u64,

    /// Value the escrow is funded with.
    pub deposit: Amount,

    /// Entries `[0, split_index)` are paid on success, `[split_index, len)` on failure.
    pub award_receivers: Vec<Address>,
    pub award_receivers_approvals: Vec<Amount>,
    pub split_index: usize,

    #[serde(default)]
    pub give_up: GiveUpPolicy,

    pub server_success_fee: Amount,
    pub server_failure_fee: Amount,
    /// Paid to the challenger when the challenge is created.
    #[serde(default)]
    pub gas_fee: Amount,
}

fn default_asset() -> Asset {
    Asset::Native
}

impl ChallengeParams {
    /// Load parameters from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse parameters from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the parameters to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Check every construction invariant against the value the escrow actually holds.
    pub fn validate(&self, held: Amount) -> Result<ChallengeTerms, ValidationError> {
        for (role, address) in [
            ("sponsor", self.sponsor),
            ("challenger", self.challenger),
            ("server", self.server),
        ] {
            if address.is_zero() {
                return Err(ValidationError::ZeroAddress { role });
            }
        }
        if let Asset::Token { contract } = self.asset {
            if contract.is_zero() {
                return Err(ValidationError::ZeroAddress { role: "token contract" });
            }
        }

        if self.day_required == 0 {
            return Err(ValidationError::ZeroDayRequired);
        }
        if self.duration < self.day_required {
            return Err(ValidationError::DurationTooShort {
                duration: self.duration,
                day_required: self.day_required,
            });
        }
        if self.goal == 0 {
            return Err(ValidationError::ZeroGoal);
        }
        if self.start_time >= self.end_time {
            return Err(ValidationError::InvalidWindow {
                start: self.start_time,
                end: self.end_time,
            });
        }

        let receivers = self.award_receivers.len();
        let approvals = self.award_receivers_approvals.len();
        if receivers != approvals {
            return Err(ValidationError::LengthMismatch { receivers, approvals });
        }
        if self.split_index > receivers {
            return Err(ValidationError::SplitIndexOutOfRange {
                index: self.split_index,
                len: receivers,
            });
        }
        let mut awards = Vec::with_capacity(receivers);
        for (i, (&address, &amount)) in self
            .award_receivers
            .iter()
            .zip(&self.award_receivers_approvals)
            .enumerate()
        {
            if address.is_zero() {
                return Err(ValidationError::ZeroAddress { role: "award receiver" });
            }
            if amount.is_zero() {
                return Err(ValidationError::ZeroApproval(i));
            }
            awards.push(AwardReceiver { address, amount });
        }
        let fail_awards = awards.split_off(self.split_index);
        let success_awards = awards;

        if self.deposit != held {
            return Err(ValidationError::DepositMismatch {
                declared: self.deposit.raw(),
                held: held.raw(),
            });
        }
        let total_reward =
            self.deposit
                .checked_sub(self.gas_fee)
                .ok_or(ValidationError::GasFeeExceedsDeposit {
                    gas_fee: self.gas_fee.raw(),
                    deposit: self.deposit.raw(),
                })?;

        check_payout_sum("success", &success_awards, self.server_success_fee, self.gas_fee, self.deposit)?;
        check_payout_sum("failure", &fail_awards, self.server_failure_fee, self.gas_fee, self.deposit)?;

        Ok(ChallengeTerms {
            sponsor: self.sponsor,
            challenger: self.challenger,
            server: self.server,
            asset: self.asset,
            gate: ClockGate::new(self.start_time, self.end_time),
            duration: self.duration,
            day_required: self.day_required,
            goal: self.goal,
            deposit: self.deposit,
            total_reward,
            gas_fee: self.gas_fee,
            server_success_fee: self.server_success_fee,
            server_failure_fee: self.server_failure_fee,
            approval_success: index_awards(&success_awards)?,
            approval_fail: index_awards(&fail_awards)?,
            success_awards,
            fail_awards,
            give_up: self.give_up,
        })
    }
}

/// `sum(list) + gas_fee + server_fee` must equal the deposit exactly.
fn check_payout_sum(
    outcome: &'static str,
    awards: &[AwardReceiver],
    server_fee: Amount,
    gas_fee: Amount,
    deposit: Amount,
) -> Result<(), ValidationError> {
    let mut total = gas_fee
        .checked_add(server_fee)
        .ok_or(ValidationError::AmountOverflow)?;
    for award in awards {
        total = total
            .checked_add(award.amount)
            .ok_or(ValidationError::AmountOverflow)?;
    }
    if total != deposit {
        return Err(ValidationError::PayoutSumMismatch {
            outcome,
            total: total.raw(),
            deposit: deposit.raw(),
        });
    }
    Ok(())
}

fn index_awards(awards: &[AwardReceiver]) -> Result<HashMap<Address, Amount>, ValidationError> {
    let mut seen = HashSet::with_capacity(awards.len());
    let mut index = HashMap::with_capacity(awards.len());
    for award in awards {
        if !seen.insert(award.address) {
            return Err(ValidationError::DuplicateReceiver(award.address));
        }
        index.insert(award.address, award.amount);
    }
    Ok(index)
}

/// Validated, immutable terms of a challenge. Only [`ChallengeParams::validate`] builds these.
#[derive(Clone, Debug)]
pub struct ChallengeTerms {
    pub(crate) sponsor: Address,
    pub(crate) challenger: Address,
    pub(crate) server: Address,
    pub(crate) asset: Asset,
    pub(crate) gate: ClockGate,
    pub(crate) duration: u64,
    pub(crate) day_required: u64,
    pub(crate) goal: u64,
    pub(crate) deposit: Amount,
    /// Deposit net of the challenger's gas stipend.
    pub(crate) total_reward: Amount,
    pub(crate) gas_fee: Amount,
    pub(crate) server_success_fee: Amount,
    pub(crate) server_failure_fee: Amount,
    pub(crate) success_awards: Vec<AwardReceiver>,
    pub(crate) fail_awards: Vec<AwardReceiver>,
    pub(crate) approval_success: HashMap<Address, Amount>,
    pub(crate) approval_fail: HashMap<Address, Amount>,
    pub(crate) give_up: GiveUpPolicy,
}

impl ChallengeTerms {
    pub fn sponsor(&self) -> Address {
        self.sponsor
    }

    pub fn challenger(&self) -> Address {
        self.challenger
    }

    pub fn server(&self) -> Address {
        self.server
    }

    pub fn asset(&self) -> Asset {
        self.asset
    }

    pub fn gate(&self) -> &ClockGate {
        &self.gate
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn day_required(&self) -> u64 {
        self.day_required
    }

    pub fn goal(&self) -> u64 {
        self.goal
    }

    pub fn deposit(&self) -> Amount {
        self.deposit
    }

    pub fn total_reward(&self) -> Amount {
        self.total_reward
    }

    pub fn gas_fee(&self) -> Amount {
        self.gas_fee
    }

    pub fn server_success_fee(&self) -> Amount {
        self.server_success_fee
    }

    pub fn server_failure_fee(&self) -> Amount {
        self.server_failure_fee
    }

    pub fn success_awards(&self) -> &[AwardReceiver] {
        &self.success_awards
    }

    pub fn fail_awards(&self) -> &[AwardReceiver] {
        &self.fail_awards
    }

    pub fn give_up(&self) -> GiveUpPolicy {
        self.give_up
    }

    /// What `receiver` is owed on success, if it is on the success list.
    pub fn approval_success_of(&self, receiver: &Address) -> Option<Amount> {
        self.approval_success.get(receiver).copied()
    }

    /// What `receiver` is owed on failure, if it is on the failure list.
    pub fn approval_fail_of(&self, receiver: &Address) -> Option<Amount> {
        self.approval_fail.get(receiver).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address(n: u8) -> Address {
        Address::new([n; 20])
    }

    /// deposit 1_000 = gas 50 + success(100 + 700 + 150) = gas 50 + failure(200 + 750)
    fn params() -> ChallengeParams {
        ChallengeParams {
            sponsor: test_address(1),
            challenger: test_address(2),
            server: test_address(3),
            asset: Asset::Native,
            start_time: Timestamp::new(1_000),
            end_time: Timestamp::new(1_000 + 10 * 86_400),
            duration: 10,
            day_required: 5,
            goal: 1_000,
            deposit: Amount::new(1_000),
            award_receivers: vec![test_address(10), test_address(11), test_address(20)],
            award_receivers_approvals: vec![Amount::new(700), Amount::new(150), Amount::new(750)],
            split_index: 2,
            give_up: GiveUpPolicy::Proportional,
            server_success_fee: Amount::new(100),
            server_failure_fee: Amount::new(200),
            gas_fee: Amount::new(50),
        }
    }

    #[test]
    fn valid_params_build_terms() {
        let terms = params().validate(Amount::new(1_000)).unwrap();
        assert_eq!(terms.total_reward(), Amount::new(950));
        assert_eq!(terms.success_awards().len(), 2);
        assert_eq!(terms.fail_awards().len(), 1);
        assert_eq!(terms.approval_success_of(&test_address(10)), Some(Amount::new(700)));
        assert_eq!(terms.approval_fail_of(&test_address(20)), Some(Amount::new(750)));
        assert_eq!(terms.approval_fail_of(&test_address(10)), None);
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let mut p = params();
        p.award_receivers_approvals.pop();
        assert_eq!(
            p.validate(Amount::new(1_000)).unwrap_err(),
            ValidationError::LengthMismatch { receivers: 3, approvals: 2 }
        );
    }

    #[test]
    fn zero_approval_rejected() {
        let mut p = params();
        p.award_receivers_approvals[1] = Amount::ZERO;
        assert_eq!(
            p.validate(Amount::new(1_000)).unwrap_err(),
            ValidationError::ZeroApproval(1)
        );
    }

    #[test]
    fn success_sum_must_match_deposit() {
        let mut p = params();
        p.server_success_fee = Amount::new(101);
        assert!(matches!(
            p.validate(Amount::new(1_000)).unwrap_err(),
            ValidationError::PayoutSumMismatch { outcome: "success", total: 1_001, .. }
        ));
    }

    #[test]
    fn failure_sum_must_match_deposit() {
        let mut p = params();
        p.server_failure_fee = Amount::new(199);
        assert!(matches!(
            p.validate(Amount::new(1_000)).unwrap_err(),
            ValidationError::PayoutSumMismatch { outcome: "failure", total: 999, .. }
        ));
    }

    #[test]
    fn deposit_must_match_held_value() {
        assert_eq!(
            params().validate(Amount::new(999)).unwrap_err(),
            ValidationError::DepositMismatch { declared: 1_000, held: 999 }
        );
    }

    #[test]
    fn duration_shorter_than_requirement_rejected() {
        let mut p = params();
        p.duration = 4;
        assert!(matches!(
            p.validate(Amount::new(1_000)).unwrap_err(),
            ValidationError::DurationTooShort { .. }
        ));
    }

    #[test]
    fn split_index_out_of_range_rejected() {
        let mut p = params();
        p.split_index = 4;
        assert_eq!(
            p.validate(Amount::new(1_000)).unwrap_err(),
            ValidationError::SplitIndexOutOfRange { index: 4, len: 3 }
        );
    }

    #[test]
    fn duplicate_receiver_in_one_list_rejected() {
        let mut p = params();
        p.award_receivers[1] = test_address(10);
        assert_eq!(
            p.validate(Amount::new(1_000)).unwrap_err(),
            ValidationError::DuplicateReceiver(test_address(10))
        );
    }

    #[test]
    fn same_receiver_on_both_lists_allowed() {
        let mut p = params();
        p.award_receivers[2] = test_address(10);
        assert!(p.validate(Amount::new(1_000)).is_ok());
    }

    #[test]
    fn zero_sponsor_rejected() {
        let mut p = params();
        p.sponsor = Address::ZERO;
        assert_eq!(
            p.validate(Amount::new(1_000)).unwrap_err(),
            ValidationError::ZeroAddress { role: "sponsor" }
        );
    }

    #[test]
    fn inverted_window_rejected() {
        let mut p = params();
        p.end_time = p.start_time;
        assert!(matches!(
            p.validate(Amount::new(1_000)).unwrap_err(),
            ValidationError::InvalidWindow { .. }
        ));
    }

    #[test]
    fn toml_round_trip_keeps_terms() {
        let p = params();
        let text = p.to_toml_string().unwrap();
        let parsed = ChallengeParams::from_toml_str(&text).unwrap();
        assert_eq!(parsed, p);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let toml = r#"
            sponsor = "0x0101010101010101010101010101010101010101"
            challenger = "0x0202020202020202020202020202020202020202"
            server = "0x0303030303030303030303030303030303030303"
            start_time = 100
            end_time = 200
            duration = 3
            day_required = 2
            goal = 500
            deposit = 30
            award_receivers = ["0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a"]
            award_receivers_approvals = [20]
            split_index = 1
            server_success_fee = 10
            server_failure_fee = 30
        "#;
        let p = ChallengeParams::from_toml_str(toml).unwrap();
        assert_eq!(p.asset, Asset::Native);
        assert_eq!(p.give_up, GiveUpPolicy::Disabled);
        assert_eq!(p.gas_fee, Amount::ZERO);
        let terms = p.validate(Amount::new(30)).unwrap();
        assert!(terms.fail_awards().is_empty());
    }

    #[test]
    fn token_asset_parses_from_toml() {
        let mut p = params();
        p.asset = Asset::Token { contract: test_address(99) };
        let parsed = ChallengeParams::from_toml_str(&p.to_toml_string().unwrap()).unwrap();
        assert_eq!(parsed.asset, Asset::Token { contract: test_address(99) });
    }

    #[test]
    fn missing_file_returns_read_error() {
        let err = ChallengeParams::from_toml_file("/nonexistent/challenge.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn file_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("challenge.toml");
        std::fs::write(&path, params().to_toml_string().unwrap()).unwrap();
        assert_eq!(ChallengeParams::from_toml_file(&path).unwrap(), params());
    }
}
