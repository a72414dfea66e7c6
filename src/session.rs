use serde::{Deserialize, Serialize};

/// One wallet the auth provider reports as connected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletHandle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_client_type: Option<String>,
}

impl WalletHandle {
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            wallet_client_type: None,
        }
    }

    /// A handle the provider lists before the wallet has exposed an account.
    pub fn pending() -> Self {
        Self::default()
    }
}

/// Snapshot of the wallet-provider session, handed to the aggregator
/// whenever the provider reports a change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub ready: bool,
    pub authenticated: bool,
    #[serde(default)]
    pub wallets: Vec<WalletHandle>,
}

impl SessionContext {
    pub fn authenticated(wallets: Vec<WalletHandle>) -> Self {
        Self {
            ready: true,
            authenticated: true,
            wallets,
        }
    }

    pub fn logged_out() -> Self {
        Self {
            ready: true,
            authenticated: false,
            wallets: vec![],
        }
    }

    /// Builds an authenticated session from a comma separated address list,
    /// as passed on the command line.
    pub fn from_address_list(list: &str) -> Self {
        let wallets = list
            .split(',')
            .map(str::trim)
            .filter(|it| !it.is_empty())
            .map(WalletHandle::with_address)
            .collect();

        Self::authenticated(wallets)
    }
}
