//! Nullable fungible token.

use std::collections::{HashMap, HashSet};
use stepstake_types::{Address, Amount, FungibleToken};

/// An in-memory token contract that reports failure by returning `false`,
/// the way non-reverting token implementations do.
#[derive(Clone, Debug)]
pub struct NullToken {
    contract: Address,
    balances: HashMap<Address, Amount>,
    refusing: HashSet<Address>,
}

impl NullToken {
    pub fn new(contract: Address) -> Self {
        Self {
            contract,
            balances: HashMap::new(),
            refusing: HashSet::new(),
        }
    }

    pub fn mint(&mut self, holder: Address, amount: Amount) {
        let entry = self.balances.entry(holder).or_insert(Amount::ZERO);
        *entry = entry.checked_add(amount).unwrap_or(Amount::new(u128::MAX));
    }

    /// Make every future transfer to `to` return `false`.
    pub fn refuse(&mut self, to: Address) {
        self.refusing.insert(to);
    }
}

impl FungibleToken for NullToken {
    fn contract(&self) -> Address {
        self.contract
    }

    fn balance_of(&self, holder: &Address) -> Amount {
        self.balances.get(holder).copied().unwrap_or(Amount::ZERO)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> bool {
        if self.refusing.contains(to) {
            return false;
        }
        let Some(remaining) = self.balance_of(from).checked_sub(amount) else {
            return false;
        };
        if from == to {
            return true;
        }
        let Some(credited) = self.balance_of(to).checked_add(amount) else {
            return false;
        };
        self.balances.insert(*from, remaining);
        self.balances.insert(*to, credited);
        true
    }
}
