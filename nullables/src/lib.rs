//! Nullable infrastructure for deterministic testing.
//!
//! All external collaborators of the escrow engine (the clock, the native
//! currency ledger, a token contract) are abstracted behind traits. This crate
//! provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (advance time, refuse a recipient)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod native;
pub mod token;

pub use clock::NullClock;
pub use native::NullNativeLedger;
pub use token::NullToken;
