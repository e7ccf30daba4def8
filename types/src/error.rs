//! Errors shared across crates.

use crate::address::Address;
use thiserror::Error;

/// Malformed address text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address must be 40 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("invalid address hex: {0}")]
    InvalidHex(String),
}

/// A ledger refused to move value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("recipient {to} rejected a transfer of {amount}")]
    Rejected { to: Address, amount: u128 },

    #[error("token transfer of {amount} to {to} returned false")]
    TokenReturnedFalse { to: Address, amount: u128 },

    #[error("recipient balance overflow")]
    Overflow,
}
