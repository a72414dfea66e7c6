use crate::{address::WalletAddress, errors::PortfolioError, json_client::JsonClient};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// `balanceOf(address)` selector.
pub const BALANCE_OF_SELECTOR: &str = "0x70a08231";

/// Decimals and symbol are fixed for the WIP token; the contract's
/// `decimals()` and `symbol()` are never queried.
pub const WIP_DECIMALS: u8 = 18;
pub const WIP_SYMBOL: &str = "WIP";

const DISPLAY_FRACTION_DIGITS: u8 = 2;
const EMPTY_RESULT: &str = "0x";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenBalance {
    /// Raw integer balance in base units, as a decimal string.
    pub balance: String,
    pub decimals: u8,
    pub symbol: String,
    /// `balance / 10^decimals` with two fraction digits.
    pub formatted: String,
}

impl TokenBalance {
    pub fn zero() -> Self {
        Self::from_raw(U256::ZERO)
    }

    pub fn from_raw(raw: U256) -> Self {
        Self {
            balance: raw.to_string(),
            decimals: WIP_DECIMALS,
            symbol: WIP_SYMBOL.to_string(),
            formatted: format_units(raw, WIP_DECIMALS, DISPLAY_FRACTION_DIGITS),
        }
    }

    /// Parses an `eth_call` result word such as `0xde0b6b3a7640000`.
    pub fn from_hex(result: &str) -> Result<Self, PortfolioError> {
        let digits = result
            .strip_prefix("0x")
            .ok_or_else(|| PortfolioError::decode(format!("Missing 0x prefix: {result}")))?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PortfolioError::decode(format!(
                "Malformed hex balance: {result}"
            )));
        }

        let raw = U256::from_str_radix(digits, 16)
            .map_err(|e| PortfolioError::decode(format!("Balance out of range ({result}): {e}")))?;

        Ok(Self::from_raw(raw))
    }
}

/// Renders `raw / 10^decimals` with `fraction_digits` digits, rounding half
/// up at the last kept digit. Integer arithmetic only.
pub fn format_units(raw: U256, decimals: u8, fraction_digits: u8) -> String {
    let fraction_digits = fraction_digits.min(decimals);
    let ten = U256::from(10u64);
    let dropped = ten.pow(U256::from(decimals - fraction_digits));

    let mut scaled = raw / dropped;
    let remainder = raw % dropped;
    // remainder * 2 >= dropped, without the overflow
    if remainder >= dropped - remainder && remainder > U256::ZERO {
        scaled += U256::from(1u64);
    }

    if fraction_digits == 0 {
        return scaled.to_string();
    }

    let unit = ten.pow(U256::from(fraction_digits));
    let whole = scaled / unit;
    let fraction = (scaled % unit).to_string();

    format!(
        "{whole}.{fraction:0>width$}",
        width = fraction_digits as usize
    )
}

/// Call data for `balanceOf(owner)`: selector plus the owner left-padded to
/// one 32-byte word.
pub fn balance_of_calldata(owner: &WalletAddress) -> Result<String, PortfolioError> {
    let owner = owner.to_address()?;

    Ok(format!(
        "{BALANCE_OF_SELECTOR}{:0>64}",
        hex::encode(owner.as_slice())
    ))
}

#[derive(Debug, Serialize)]
struct CallObject<'a> {
    to: &'a str,
    data: String,
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: (CallObject<'a>, &'static str),
    id: u64,
}

impl<'a> JsonRpcRequest<'a> {
    fn eth_call(to: &'a str, data: String) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "eth_call",
            params: (CallObject { to, data }, "latest"),
            id: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

/// Reads the WIP token balance of a wallet through `eth_call`.
#[derive(Clone, Debug)]
pub struct BalanceFetcher {
    client: JsonClient,
    token_address: String,
}

impl BalanceFetcher {
    pub fn new(client: JsonClient, token_address: impl Into<String>) -> Self {
        Self {
            client,
            token_address: token_address.into(),
        }
    }

    /// Never fails: any problem is logged and the zero balance returned.
    pub async fn fetch(&self, owner: &WalletAddress) -> TokenBalance {
        match self.try_fetch(owner).await {
            Ok(balance) => balance,
            Err(e) => {
                warn!(owner = %owner, error = %e, "Failed to fetch token balance");
                TokenBalance::zero()
            },
        }
    }

    pub async fn try_fetch(&self, owner: &WalletAddress) -> Result<TokenBalance, PortfolioError> {
        let data = balance_of_calldata(owner)?;
        let request = JsonRpcRequest::eth_call(&self.token_address, data);

        debug!(
            owner = %owner,
            token = %self.token_address,
            rpc = %self.client.endpoint(),
            "Sending balanceOf eth_call"
        );

        let reply = self.client.post(&request).await?;
        let response: JsonRpcResponse = reply.parse(self.client.endpoint())?;

        if let Some(err) = response.error {
            return Err(PortfolioError::rpc(format!(
                "RPC error {}: {}",
                err.code, err.message
            )));
        }

        match response.result.as_deref() {
            None | Some(EMPTY_RESULT) => {
                debug!(owner = %owner, "eth_call returned no data, using zero balance");
                Ok(TokenBalance::zero())
            },
            Some(result) => {
                let balance = TokenBalance::from_hex(result)?;
                info!(
                    owner = %owner.abbreviated(),
                    balance = %balance.formatted,
                    symbol = %balance.symbol,
                    "Fetched token balance"
                );
                Ok(balance)
            },
        }
    }
}
