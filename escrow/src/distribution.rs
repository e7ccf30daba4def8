//! Payout plans for each terminal outcome.
//!
//! These functions only compute who gets what; the challenge hands the
//! resulting [`Settlement`] to an asset port. All arithmetic is checked.

use crate::error::{ArithmeticError, ChallengeError};
use crate::params::{AwardReceiver, ChallengeTerms, GiveUpPolicy};
use serde::{Deserialize, Serialize};
use stepstake_types::{Address, Amount};

/// Why a payout line exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutRole {
    Server,
    Sponsor,
    Receiver,
    Challenger,
}

/// One planned transfer out of the escrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub to: Address,
    pub amount: Amount,
    pub role: PayoutRole,
}

impl Payout {
    pub fn new(to: Address, amount: Amount, role: PayoutRole) -> Self {
        Self { to, amount, role }
    }
}

/// An ordered list of payouts. Zero-amount lines are never included.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    payouts: Vec<Payout>,
}

impl Settlement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, to: Address, amount: Amount, role: PayoutRole) {
        if !amount.is_zero() {
            self.payouts.push(Payout::new(to, amount, role));
        }
    }

    pub fn payouts(&self) -> &[Payout] {
        &self.payouts
    }

    pub fn into_payouts(self) -> Vec<Payout> {
        self.payouts
    }

    pub fn is_empty(&self) -> bool {
        self.payouts.is_empty()
    }

    /// Sum of every line.
    pub fn total(&self) -> Result<Amount, ArithmeticError> {
        self.payouts.iter().try_fold(Amount::ZERO, |acc, p| {
            acc.checked_add(p.amount).ok_or(ArithmeticError::Overflow)
        })
    }

    /// Sum of the lines addressed to `who`.
    pub fn paid_to(&self, who: &Address) -> Result<Amount, ArithmeticError> {
        self.payouts
            .iter()
            .filter(|p| &p.to == who)
            .try_fold(Amount::ZERO, |acc, p| {
                acc.checked_add(p.amount).ok_or(ArithmeticError::Overflow)
            })
    }
}

fn award_lines(settlement: &mut Settlement, awards: &[AwardReceiver]) {
    for award in awards {
        settlement.push(award.address, award.amount, PayoutRole::Receiver);
    }
}

/// Server success fee plus every success-list award.
pub fn success_settlement(terms: &ChallengeTerms) -> Settlement {
    let mut settlement = Settlement::new();
    settlement.push(terms.server, terms.server_success_fee, PayoutRole::Server);
    award_lines(&mut settlement, &terms.success_awards);
    settlement
}

/// Server failure fee plus every fail-list award. Also used by a forced close.
pub fn failure_settlement(terms: &ChallengeTerms) -> Settlement {
    let mut settlement = Settlement::new();
    settlement.push(terms.server, terms.server_failure_fee, PayoutRole::Server);
    award_lines(&mut settlement, &terms.fail_awards);
    settlement
}

/// Voluntary withdrawal.
///
/// The pool is `total_reward - server_failure_fee`. Under the proportional
/// policy receivers share `pool * current_status / day_required`, each in
/// proportion to its success award over the pool, and the sponsor takes
/// whatever the receivers do not, truncation dust included. The server
/// failure fee is paid last. A challenge created without give-up has no plan.
pub fn give_up_settlement(
    terms: &ChallengeTerms,
    current_status: u64,
) -> Result<Settlement, ChallengeError> {
    let pool = terms
        .total_reward
        .checked_sub(terms.server_failure_fee)
        .ok_or(ArithmeticError::Underflow)?;

    let mut settlement = Settlement::new();
    match terms.give_up {
        GiveUpPolicy::Proportional => {
            let shares = receiver_shares(&terms.success_awards, pool, current_status, terms.day_required)?;
            let paid = shares.iter().try_fold(Amount::ZERO, |acc, (_, share)| {
                acc.checked_add(*share).ok_or(ArithmeticError::Overflow)
            })?;
            let to_sponsor = pool.checked_sub(paid).ok_or(ArithmeticError::Underflow)?;
            settlement.push(terms.sponsor, to_sponsor, PayoutRole::Sponsor);
            for (to, share) in shares {
                settlement.push(to, share, PayoutRole::Receiver);
            }
        }
        GiveUpPolicy::AllToSponsor => {
            settlement.push(terms.sponsor, pool, PayoutRole::Sponsor);
        }
        GiveUpPolicy::Disabled => return Err(ChallengeError::GiveUpDisabled),
    }
    settlement.push(terms.server, terms.server_failure_fee, PayoutRole::Server);
    Ok(settlement)
}

/// Each receiver's cut of the pro-rated pool. Empty when nothing was earned.
///
/// Both products go through a 256-bit intermediate, so full-precision token
/// amounts never overflow before the division.
pub fn receiver_shares(
    awards: &[AwardReceiver],
    pool: Amount,
    current_status: u64,
    day_required: u64,
) -> Result<Vec<(Address, Amount)>, ArithmeticError> {
    if day_required == 0 {
        return Err(ArithmeticError::DivisionByZero);
    }
    let to_receivers = pool
        .checked_mul_div(u128::from(current_status), u128::from(day_required))
        .ok_or(ArithmeticError::Overflow)?;
    if to_receivers.is_zero() {
        return Ok(Vec::new());
    }

    awards
        .iter()
        .map(|award| {
            let share = award
                .amount
                .checked_mul_div(to_receivers.raw(), pool.raw())
                .ok_or(ArithmeticError::Overflow)?;
            Ok((award.address, share))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ChallengeParams;
    use stepstake_types::{Asset, Timestamp};

    fn test_address(n: u8) -> Address {
        Address::new([n; 20])
    }

    /// deposit 1_000, gas 50, total_reward 950, success fee 100, failure fee 150.
    /// Success list: 10 -> 600, 11 -> 250. Fail list: 20 -> 800.
    fn terms(policy: GiveUpPolicy) -> ChallengeTerms {
        ChallengeParams {
            sponsor: test_address(1),
            challenger: test_address(2),
            server: test_address(3),
            asset: Asset::Native,
            start_time: Timestamp::new(0),
            end_time: Timestamp::new(10 * 86_400),
            duration: 10,
            day_required: 4,
            goal: 1_000,
            deposit: Amount::new(1_000),
            award_receivers: vec![test_address(10), test_address(11), test_address(20)],
            award_receivers_approvals: vec![Amount::new(600), Amount::new(250), Amount::new(800)],
            split_index: 2,
            give_up: policy,
            server_success_fee: Amount::new(100),
            server_failure_fee: Amount::new(150),
            gas_fee: Amount::new(50),
        }
        .validate(Amount::new(1_000))
        .unwrap()
    }

    #[test]
    fn success_pays_fee_and_success_list() {
        let s = success_settlement(&terms(GiveUpPolicy::Disabled));
        assert_eq!(s.total().unwrap(), Amount::new(950));
        assert_eq!(s.paid_to(&test_address(3)).unwrap(), Amount::new(100));
        assert_eq!(s.paid_to(&test_address(10)).unwrap(), Amount::new(600));
        assert_eq!(s.paid_to(&test_address(20)).unwrap(), Amount::ZERO);
    }

    #[test]
    fn failure_pays_fee_and_fail_list() {
        let s = failure_settlement(&terms(GiveUpPolicy::Disabled));
        assert_eq!(s.total().unwrap(), Amount::new(950));
        assert_eq!(s.paid_to(&test_address(3)).unwrap(), Amount::new(150));
        assert_eq!(s.paid_to(&test_address(20)).unwrap(), Amount::new(800));
    }

    #[test]
    fn give_up_at_zero_returns_pool_to_sponsor() {
        let s = give_up_settlement(&terms(GiveUpPolicy::Proportional), 0).unwrap();
        assert_eq!(s.paid_to(&test_address(1)).unwrap(), Amount::new(800));
        assert_eq!(s.paid_to(&test_address(10)).unwrap(), Amount::ZERO);
        assert_eq!(s.paid_to(&test_address(3)).unwrap(), Amount::new(150));
        assert_eq!(s.total().unwrap(), Amount::new(950));
    }

    #[test]
    fn give_up_all_to_sponsor_ignores_progress() {
        let s = give_up_settlement(&terms(GiveUpPolicy::AllToSponsor), 4).unwrap();
        assert_eq!(s.paid_to(&test_address(1)).unwrap(), Amount::new(800));
        assert_eq!(s.payouts().len(), 2);
    }

    #[test]
    fn give_up_has_no_plan_when_disabled() {
        let err = give_up_settlement(&terms(GiveUpPolicy::Disabled), 0).unwrap_err();
        assert_eq!(err, ChallengeError::GiveUpDisabled);
    }

    #[test]
    fn give_up_splits_full_precision_amounts() {
        // 18-decimal amounts: the per-receiver product is ~5e39, past u128::MAX.
        let e18 = 10u128.pow(18);
        let awards = [AwardReceiver { address: test_address(10), amount: Amount::new(98 * e18) }];
        let shares = receiver_shares(&awards, Amount::new(98 * e18), 1, 2).unwrap();
        assert_eq!(shares, vec![(test_address(10), Amount::new(49 * e18))]);
    }

    #[test]
    fn give_up_halfway_splits_pool() {
        // pool 800, to_receivers 400; shares 600*400/800 = 300 and 250*400/800 = 125.
        let s = give_up_settlement(&terms(GiveUpPolicy::Proportional), 2).unwrap();
        assert_eq!(s.paid_to(&test_address(10)).unwrap(), Amount::new(300));
        assert_eq!(s.paid_to(&test_address(11)).unwrap(), Amount::new(125));
        assert_eq!(s.paid_to(&test_address(1)).unwrap(), Amount::new(375));
        assert_eq!(s.total().unwrap(), Amount::new(950));
    }

    #[test]
    fn give_up_sponsor_line_comes_first_and_fee_last() {
        let s = give_up_settlement(&terms(GiveUpPolicy::Proportional), 2).unwrap();
        let roles: Vec<_> = s.payouts().iter().map(|p| p.role).collect();
        assert_eq!(
            roles,
            vec![PayoutRole::Sponsor, PayoutRole::Receiver, PayoutRole::Receiver, PayoutRole::Server]
        );
    }

    #[test]
    fn give_up_truncation_dust_goes_to_sponsor() {
        // to_receivers = 800 * 1 / 4 = 200; shares 600*200/800 = 150, 250*200/800 = 62.
        let s = give_up_settlement(&terms(GiveUpPolicy::Proportional), 1).unwrap();
        assert_eq!(s.paid_to(&test_address(11)).unwrap(), Amount::new(62));
        assert_eq!(s.paid_to(&test_address(1)).unwrap(), Amount::new(800 - 150 - 62));
    }

    #[test]
    fn shares_exceeding_pool_underflow() {
        // success awards 850 exceed the 800 pool once every day is met
        let err = give_up_settlement(&terms(GiveUpPolicy::Proportional), 4).unwrap_err();
        assert_eq!(err, ChallengeError::Arithmetic(ArithmeticError::Underflow));
    }

    #[test]
    fn zero_share_lines_are_dropped() {
        let mut s = Settlement::new();
        s.push(test_address(1), Amount::ZERO, PayoutRole::Sponsor);
        assert!(s.is_empty());
    }

    #[test]
    fn receiver_shares_reject_zero_requirement() {
        let awards = [AwardReceiver { address: test_address(1), amount: Amount::new(5) }];
        assert_eq!(
            receiver_shares(&awards, Amount::new(10), 1, 0).unwrap_err(),
            ArithmeticError::DivisionByZero
        );
    }
}
