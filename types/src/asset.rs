//! Which asset an escrow instance holds.

use crate::address::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The asset an escrow instance is denominated in. Fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Asset {
    /// The chain's native currency.
    Native,
    /// A fungible token identified by its contract address.
    Token { contract: Address },
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Token { contract } => write!(f, "token {contract}"),
        }
    }
}
