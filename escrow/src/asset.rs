//! The asset transfer port: how the escrow moves value.
//!
//! A challenge never owns a port: every mutating operation receives a
//! `&mut dyn AssetPort`. [`NativeAsset`] wraps a native-currency ledger and
//! [`TokenAsset`] a fungible-token contract. Both apply a batch of payouts
//! all-or-nothing.

use crate::distribution::Payout;
use stepstake_types::{Address, Amount, Asset, FungibleToken, NativeLedger, TransferError};

pub trait AssetPort {
    /// Which asset this port moves.
    fn asset(&self) -> Asset;

    fn balance_of(&self, who: &Address) -> Amount;

    /// Apply every payout from `from` in order. Either all lines land or none do.
    fn transfer_all(&mut self, from: &Address, payouts: &[Payout]) -> Result<(), TransferError>;
}

/// Native currency held directly by the escrow account.
#[derive(Clone, Debug)]
pub struct NativeAsset<L> {
    ledger: L,
}

impl<L: NativeLedger> NativeAsset<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn into_inner(self) -> L {
        self.ledger
    }
}

impl<L: NativeLedger> AssetPort for NativeAsset<L> {
    fn asset(&self) -> Asset {
        Asset::Native
    }

    fn balance_of(&self, who: &Address) -> Amount {
        self.ledger.balance_of(who)
    }

    fn transfer_all(&mut self, from: &Address, payouts: &[Payout]) -> Result<(), TransferError> {
        let mut staged = self.ledger.clone();
        for payout in payouts {
            staged.send(from, &payout.to, payout.amount)?;
            tracing::debug!(to = %payout.to, amount = %payout.amount, "native transfer staged");
        }
        self.ledger = staged;
        Ok(())
    }
}

/// A fungible token in which the escrow account holds a balance.
#[derive(Clone, Debug)]
pub struct TokenAsset<T> {
    token: T,
}

impl<T: FungibleToken> TokenAsset<T> {
    pub fn new(token: T) -> Self {
        Self { token }
    }

    pub fn token(&self) -> &T {
        &self.token
    }

    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    pub fn into_inner(self) -> T {
        self.token
    }
}

impl<T: FungibleToken> AssetPort for TokenAsset<T> {
    fn asset(&self) -> Asset {
        Asset::Token {
            contract: self.token.contract(),
        }
    }

    fn balance_of(&self, who: &Address) -> Amount {
        self.token.balance_of(who)
    }

    fn transfer_all(&mut self, from: &Address, payouts: &[Payout]) -> Result<(), TransferError> {
        let mut staged = self.token.clone();
        for payout in payouts {
            if !staged.transfer(from, &payout.to, payout.amount) {
                return Err(TransferError::TokenReturnedFalse {
                    to: payout.to,
                    amount: payout.amount.raw(),
                });
            }
            tracing::debug!(to = %payout.to, amount = %payout.amount, "token transfer staged");
        }
        self.token = staged;
        Ok(())
    }
}
