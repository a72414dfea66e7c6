mod common;

use common::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use story_portfolio::{balance::TokenBalance, WalletAddress};
use wiremock::{MockServer, ResponseTemplate};

#[rstest]
#[case("0xde0b6b3a7640000", "1000000000000000000", "1.00")]
#[case("0x1bc16d674ec80000", "2000000000000000000", "2.00")]
#[case(
    "0x00000000000000000000000000000000000000000000000029a2241af62c0000",
    "3000000000000000000",
    "3.00"
)]
#[tokio::test]
async fn test_balance_decodes_result(
    #[case] result: &str,
    #[case] raw: &str,
    #[case] formatted: &str,
) {
    initialize_logging();
    let server = MockServer::start().await;
    mount_rpc(&server, rpc_result(result)).await;

    let balance = balance_fetcher(&server).fetch(&owner()).await;

    assert_eq!(balance.balance, raw);
    assert_eq!(balance.formatted, formatted);
    assert_eq!(balance.decimals, 18);
    assert_eq!(balance.symbol, "WIP");
}

#[rstest]
#[case("empty data", rpc_result("0x"))]
#[case("no result", json_response(200, json!({ "jsonrpc": "2.0", "id": 1 })))]
#[case(
    "rpc error",
    json_response(200, json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": -32000, "message": "execution reverted" } }))
)]
#[case("malformed hex", rpc_result("0xnothex"))]
#[case("non json body", ResponseTemplate::new(200).set_body_string("gateway timeout"))]
#[case("http error", ResponseTemplate::new(503))]
#[tokio::test]
async fn test_balance_falls_back_to_zero(
    #[case] description: &str,
    #[case] response: ResponseTemplate,
) {
    let server = MockServer::start().await;
    mount_rpc(&server, response).await;

    let balance = balance_fetcher(&server).fetch(&owner()).await;

    assert_eq!(balance, TokenBalance::zero(), "{description}");
}

#[tokio::test]
async fn test_balance_sends_balance_of_call() {
    let server = MockServer::start().await;
    mount_rpc(&server, rpc_result("0x0")).await;

    balance_fetcher(&server).fetch(&owner()).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&requests[0].body).unwrap(),
        json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [
                {
                    "to": TOKEN,
                    "data": "0x70a08231000000000000000000000000abc0000000000000000000000000000000000123"
                },
                "latest"
            ],
            "id": 1
        })
    );
}

#[tokio::test]
async fn test_balance_skips_call_for_malformed_address() {
    let server = MockServer::start().await;
    mount_rpc(&server, rpc_result("0xde0b6b3a7640000")).await;

    let balance = balance_fetcher(&server)
        .fetch(&WalletAddress::new("0xabc...123"))
        .await;

    assert_eq!(balance, TokenBalance::zero());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_balance_unreachable_rpc_falls_back_to_zero() {
    let server = MockServer::start().await;
    let fetcher = balance_fetcher(&server);
    drop(server);

    assert_eq!(fetcher.fetch(&owner()).await, TokenBalance::zero());
}
