//! Nullable native-currency ledger.

use std::collections::{HashMap, HashSet};
use stepstake_types::{Address, Amount, NativeLedger, TransferError};

/// An in-memory native balance table.
///
/// Recipients added with [`NullNativeLedger::reject`] behave like accounts whose
/// receive hook reverts: any send to them fails.
#[derive(Clone, Debug, Default)]
pub struct NullNativeLedger {
    balances: HashMap<Address, Amount>,
    rejecting: HashSet<Address>,
    sends: Vec<(Address, Address, Amount)>,
}

impl NullNativeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account out of thin air (a deposit from outside the system).
    pub fn mint(&mut self, holder: Address, amount: Amount) {
        let entry = self.balances.entry(holder).or_insert(Amount::ZERO);
        *entry = entry.checked_add(amount).unwrap_or(Amount::new(u128::MAX));
    }

    /// Make every future send to `to` fail.
    pub fn reject(&mut self, to: Address) {
        self.rejecting.insert(to);
    }

    /// Successful sends in the order they happened.
    pub fn sends(&self) -> &[(Address, Address, Amount)] {
        &self.sends
    }
}

impl NativeLedger for NullNativeLedger {
    fn balance_of(&self, holder: &Address) -> Amount {
        self.balances.get(holder).copied().unwrap_or(Amount::ZERO)
    }

    fn send(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TransferError> {
        if self.rejecting.contains(to) {
            return Err(TransferError::Rejected {
                to: *to,
                amount: amount.raw(),
            });
        }
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientBalance {
                needed: amount.raw(),
                available: available.raw(),
            })?;
        if from == to {
            self.sends.push((*from, *to, amount));
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        self.balances.insert(*from, remaining);
        self.balances.insert(*to, credited);
        self.sends.push((*from, *to, amount));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address(n: u8) -> Address {
        Address::new([n; 20])
    }

    #[test]
    fn send_moves_balance() {
        let mut ledger = NullNativeLedger::new();
        ledger.mint(test_address(1), Amount::new(100));
        ledger
            .send(&test_address(1), &test_address(2), Amount::new(40))
            .unwrap();
        assert_eq!(ledger.balance_of(&test_address(1)), Amount::new(60));
        assert_eq!(ledger.balance_of(&test_address(2)), Amount::new(40));
        assert_eq!(ledger.sends().len(), 1);
    }

    #[test]
    fn overdraft_fails_without_mutation() {
        let mut ledger = NullNativeLedger::new();
        ledger.mint(test_address(1), Amount::new(10));
        let err = ledger
            .send(&test_address(1), &test_address(2), Amount::new(11))
            .unwrap_err();
        assert_eq!(
            err,
            TransferError::InsufficientBalance {
                needed: 11,
                available: 10
            }
        );
        assert_eq!(ledger.balance_of(&test_address(1)), Amount::new(10));
    }

    #[test]
    fn rejecting_recipient_fails() {
        let mut ledger = NullNativeLedger::new();
        ledger.mint(test_address(1), Amount::new(10));
        ledger.reject(test_address(3));
        let err = ledger
            .send(&test_address(1), &test_address(3), Amount::new(1))
            .unwrap_err();
        assert!(matches!(err, TransferError::Rejected { .. }));
    }
}
