use crate::errors::PortfolioError;
use crate::session::SessionContext;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex account identifier of the connected wallet. Equality ignores case,
/// so checksummed and lowercase spellings name the same account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the address as a 20-byte EVM account. Checksum casing is not
    /// enforced.
    pub fn to_address(&self) -> Result<Address, PortfolioError> {
        self.0
            .parse::<Address>()
            .map_err(|_| PortfolioError::invalid_address(&self.0))
    }

    /// 0x1234...abcd, for log lines and compact display. Addresses that cannot
    /// be cut on char boundaries are returned whole.
    pub fn abbreviated(&self) -> String {
        let len = self.0.len();
        if len <= 10 {
            return self.0.clone();
        }

        match (self.0.get(..6), self.0.get(len - 4..)) {
            (Some(head), Some(tail)) => format!("{head}...{tail}"),
            _ => self.0.clone(),
        }
    }
}

impl PartialEq for WalletAddress {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for WalletAddress {}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Picks the first connected wallet exposing a non-empty address.
/// Returns `None` for unauthenticated sessions or when no wallet qualifies.
pub fn resolve_address(session: &SessionContext) -> Option<WalletAddress> {
    if !session.authenticated {
        return None;
    }

    session
        .wallets
        .iter()
        .filter_map(|wallet| wallet.address.as_deref())
        .find(|address| !address.trim().is_empty())
        .map(WalletAddress::new)
}
