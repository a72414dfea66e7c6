use crate::{
    address::{resolve_address, WalletAddress},
    assets::{AssetFetcher, AssetRecord},
    balance::{BalanceFetcher, TokenBalance},
    config::Config,
    errors::AppError,
    json_client::JsonClient,
    session::SessionContext,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

/// Everything the portfolio page renders.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioViewState {
    pub loading: bool,
    pub error: Option<String>,
    pub assets: Vec<AssetRecord>,
    pub balance: Option<TokenBalance>,
    pub address: Option<WalletAddress>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PortfolioViewState {
    /// e.g. "You own 1 IP asset", "You own 3 IP assets".
    pub fn summary(&self) -> String {
        let count = self.assets.len();
        let noun = if count == 1 { "asset" } else { "assets" };
        format!("You own {count} IP {noun}")
    }

    pub fn is_empty(&self) -> bool {
        !self.loading && self.error.is_none() && self.assets.is_empty()
    }
}

#[derive(Debug)]
struct Inner {
    assets: AssetFetcher,
    balance: BalanceFetcher,
    state: RwLock<PortfolioViewState>,
    generation: AtomicU64,
    current_address: Mutex<Option<WalletAddress>>,
}

/// Owns the view state and runs fetch cycles against it. Cheap to clone;
/// clones share the same state.
#[derive(Clone, Debug)]
pub struct PortfolioAggregator {
    inner: Arc<Inner>,
}

impl PortfolioAggregator {
    pub fn new(assets: AssetFetcher, balance: BalanceFetcher) -> Self {
        Self {
            inner: Arc::new(Inner {
                assets,
                balance,
                state: RwLock::new(PortfolioViewState::default()),
                generation: AtomicU64::new(0),
                current_address: Mutex::new(None),
            }),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let search = JsonClient::new(config.search_url.clone(), config.request_timeout)?;
        let rpc = JsonClient::new(config.rpc_url.clone(), config.request_timeout)?;

        Ok(Self::new(
            AssetFetcher::new(search),
            BalanceFetcher::new(rpc, config.token_address.clone()),
        ))
    }

    pub async fn view_state(&self) -> PortfolioViewState {
        self.inner.state.read().await.clone()
    }

    pub async fn current_address(&self) -> Option<WalletAddress> {
        self.inner.current_address.lock().await.clone()
    }

    /// Reacts to a wallet-provider update. A newly resolved address starts
    /// a cycle, an unchanged one is ignored, and losing the address (logout
    /// or no usable wallet) resets the view.
    pub async fn on_session_change(&self, session: &SessionContext) -> PortfolioViewState {
        let resolved = resolve_address(session);

        {
            let mut current = self.inner.current_address.lock().await;
            if *current == resolved {
                debug!(address = ?resolved, "Wallet address unchanged");
                drop(current);
                return self.view_state().await;
            }
            *current = resolved.clone();
        }

        match resolved {
            Some(address) => self.refresh(&address).await,
            None => {
                info!("No wallet address, clearing portfolio");
                self.inner.generation.fetch_add(1, Ordering::SeqCst);
                let mut state = self.inner.state.write().await;
                *state = PortfolioViewState::default();
                state.clone()
            },
        }
    }

    /// Runs one fetch cycle for `address`: assets, then balance, both always
    /// attempted. Writes from a cycle superseded by a later one are dropped.
    pub async fn refresh(&self, address: &WalletAddress) -> PortfolioViewState {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(address = %address.abbreviated(), generation, "Loading portfolio");

        self.write_if_current(generation, |state| {
            state.loading = true;
            state.error = None;
            state.address = Some(address.clone());
        })
        .await;

        let assets = self.inner.assets.fetch(address).await;
        self.write_if_current(generation, |state| match assets {
            Ok(assets) => state.assets = assets,
            Err(e) => {
                error!(address = %address, error = %e, "Error fetching portfolio data");
                state.error = Some(e.to_string());
            },
        })
        .await;

        let balance = self.inner.balance.fetch(address).await;
        self.write_if_current(generation, |state| {
            state.balance = Some(balance);
            state.loading = false;
            state.updated_at = Some(Utc::now());
        })
        .await;

        let state = self.view_state().await;
        info!(
            address = %address.abbreviated(),
            generation,
            assets = state.assets.len(),
            failed = state.error.is_some(),
            "Portfolio cycle finished"
        );

        state
    }

    async fn write_if_current<F>(&self, generation: u64, update: F) -> bool
    where
        F: FnOnce(&mut PortfolioViewState),
    {
        let mut state = self.inner.state.write().await;

        // Checked under the write lock so a newer cycle cannot interleave.
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding result of a superseded cycle");
            return false;
        }

        update(&mut *state);
        true
    }
}
