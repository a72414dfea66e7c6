#![allow(dead_code)]

use reqwest::Url;
use serde_json::{json, Value};
use std::sync::LazyLock;
use std::time::Duration;
use story_portfolio::{
    assets::AssetFetcher, balance::BalanceFetcher, json_client::JsonClient,
    portfolio::PortfolioAggregator, WalletAddress,
};
use wiremock::{
    matchers::{body_json, body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const SEARCH_PATH: &str = "/api/search-by-owner";
pub const RPC_PATH: &str = "/rpc";
pub const TOKEN: &str = "0x91ecf2d7f0b1bad77592f90a5f46a5e7fef5e7f2";
pub const OWNER: &str = "0xabc0000000000000000000000000000000000123";
pub const OTHER_OWNER: &str = "0xdef0000000000000000000000000000000000456";

static INIT_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
});

pub fn initialize_logging() {
    let _ = *INIT_LOGGING;
}

pub fn owner() -> WalletAddress {
    WalletAddress::new(OWNER)
}

fn client(server: &MockServer, endpoint: &str) -> JsonClient {
    let url = Url::parse(&format!("{}{endpoint}", server.uri())).expect("mock server url");

    JsonClient::new(url, Duration::from_secs(5)).expect("client")
}

pub fn asset_fetcher(server: &MockServer) -> AssetFetcher {
    AssetFetcher::new(client(server, SEARCH_PATH))
}

pub fn balance_fetcher(server: &MockServer) -> BalanceFetcher {
    BalanceFetcher::new(client(server, RPC_PATH), TOKEN)
}

pub fn aggregator(server: &MockServer) -> PortfolioAggregator {
    PortfolioAggregator::new(asset_fetcher(server), balance_fetcher(server))
}

pub async fn mount_assets(server: &MockServer, owner: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(body_json(json!({ "ownerAddress": owner })))
        .respond_with(response)
        .mount(server)
        .await;
}

pub async fn mount_rpc(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(body_partial_json(json!({ "jsonrpc": "2.0", "method": "eth_call" })))
        .respond_with(response)
        .mount(server)
        .await;
}

pub fn rpc_result(result: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": result }))
}

pub fn json_response(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}
