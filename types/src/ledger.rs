//! Minimal ledger capabilities the escrow engine consumes.
//!
//! Neither trait is a general token standard: they expose exactly the balance
//! lookup and value movement an escrow needs. Both require `Clone` so a caller
//! can stage a batch of transfers on a copy and commit it only when every line
//! succeeded.

use crate::address::Address;
use crate::amount::Amount;
use crate::error::TransferError;

/// The chain's native-currency ledger. A failed send is an error.
pub trait NativeLedger: Clone {
    fn balance_of(&self, holder: &Address) -> Amount;

    fn send(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TransferError>;
}

/// A fungible token contract. A failed transfer may simply return `false`.
pub trait FungibleToken: Clone {
    /// The token contract's own address.
    fn contract(&self) -> Address;

    fn balance_of(&self, holder: &Address) -> Amount;

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> bool;
}
