//! Fundamental types for stepstake.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account addresses, amounts, timestamps and the clock seam, signing keys, and the
//! minimal ledger traits the escrow engine moves value through.

pub mod address;
pub mod amount;
pub mod asset;
pub mod error;
pub mod keys;
pub mod ledger;
pub mod time;

pub use address::Address;
pub use amount::Amount;
pub use asset::Asset;
pub use error::{AddressError, TransferError};
pub use keys::{KeyPair, PrivateKey, PublicKey, RecoverableSignature};
pub use ledger::{FungibleToken, NativeLedger};
pub use time::{Clock, SystemClock, Timestamp, DAY_SECS};
