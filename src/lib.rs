pub mod address;
pub mod assets;
pub mod balance;
pub mod cli;
pub mod config;
pub mod errors;
pub mod json_client;
pub mod logging;
pub mod portfolio;
pub mod session;

pub use address::{resolve_address, WalletAddress};
pub use assets::{AssetFetcher, AssetRecord};
pub use balance::{BalanceFetcher, TokenBalance};
pub use errors::{AppError, PortfolioError};
pub use portfolio::{PortfolioAggregator, PortfolioViewState};
pub use session::{SessionContext, WalletHandle};
