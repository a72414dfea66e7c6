use serde::{Deserialize, Serialize};
use std::{fmt, io};
use thiserror::Error;
use tracing::error;

/// Fallback shown when the assets lookup fails without a `message`.
pub const ASSETS_FALLBACK_MESSAGE: &str = "Failed to fetch IP assets";

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Startup error: {0}")]
    Server(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PortfolioErrorKind {
    AssetLookup,
    Rpc,
    Decode,
    InvalidAddress,
}

/// Failure of a single fetch step.
/// Contains the following fields:
/// - kind: which step failed
/// - message: the text presented to the user for that failure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortfolioError {
    pub kind: PortfolioErrorKind,
    pub message: String,
}

impl PortfolioError {
    /// Assets lookup failure. An empty message becomes the generic fallback.
    pub fn asset_lookup(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            ASSETS_FALLBACK_MESSAGE.to_string()
        } else {
            message
        };

        Self {
            kind: PortfolioErrorKind::AssetLookup,
            message,
        }
    }

    pub fn rpc(message: impl Into<String>) -> Self {
        Self {
            kind: PortfolioErrorKind::Rpc,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: PortfolioErrorKind::Decode,
            message: message.into(),
        }
    }

    pub fn invalid_address(address: &str) -> Self {
        Self {
            kind: PortfolioErrorKind::InvalidAddress,
            message: format!("Invalid or malformed wallet address: {address}"),
        }
    }
}

impl fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PortfolioError {}

impl From<reqwest::Error> for PortfolioError {
    fn from(e: reqwest::Error) -> Self {
        PortfolioError::rpc(format!("HTTP error: {e}"))
    }
}

impl From<serde_json::Error> for PortfolioError {
    fn from(e: serde_json::Error) -> Self {
        PortfolioError::decode(format!("JSON error: {e}"))
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        error!("I/O Error occurred: {}", err);
        AppError::Server(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Client(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL error: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Server(format!("JSON error: {err}"))
    }
}
