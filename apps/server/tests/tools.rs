mod common;

use axum::http::Method;
use serde_json::json;
use tempfile::tempdir;

use common::{memory_config, request, router_for, send, sqlite_config};

#[tokio::test]
async fn lists_tool_definitions() {
    let app = router_for(&memory_config()).await;

    let (status, body) = send(&app, request(Method::GET, "/api/v1/tools", None)).await;
    assert_eq!(status, 200);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "add_to_portfolio",
            "remove_from_portfolio",
            "update_position",
            "get_holdings",
            "get_transaction_history",
        ]
    );
}

#[tokio::test]
async fn buy_and_sell_flow_over_sqlite() {
    let tmp = tempdir().unwrap();
    let app = router_for(&sqlite_config(&tmp)).await;

    let (status, bought) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/tools/add_to_portfolio",
            Some(json!({"ticker": "aapl", "quantity": 10, "purchase_price": 150.0})),
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(bought["success"], true);
    assert_eq!(bought["new_cash_balance"], json!(98500.0));
    let position_id = bought["holding"]["id"].as_str().unwrap().to_string();

    let (_, portfolio) = send(&app, request(Method::GET, "/api/v1/portfolio", None)).await;
    assert_eq!(portfolio["cash_balance"], json!(98500.0));

    let (_, sold) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/tools/remove_from_portfolio",
            Some(json!({"position_id": position_id})),
        ),
    )
    .await;
    assert_eq!(sold["success"], true);
    assert_eq!(sold["holding_removed"], true);
    assert_eq!(sold["new_cash_balance"], json!(100000.0));

    let (_, history) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/tools/get_transaction_history",
            Some(json!({"ticker": "AAPL"})),
        ),
    )
    .await;
    assert_eq!(history["count"], 2);
    assert_eq!(history["filters"]["ticker"], "AAPL");
}

#[tokio::test]
async fn business_failures_use_the_envelope() {
    let app = router_for(&memory_config()).await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/tools/add_to_portfolio",
            Some(json!({"ticker": "AAPL", "quantity": 1000000, "purchase_price": 150.0})),
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "insufficient_funds");

    let (_, unknown) = send(&app, request(Method::POST, "/api/v1/tools/drop_tables", None)).await;
    assert_eq!(unknown["success"], false);
    assert_eq!(unknown["error"], "not_found");
}

#[tokio::test]
async fn missing_body_means_no_arguments() {
    let app = router_for(&memory_config()).await;

    let (status, holdings) =
        send(&app, request(Method::POST, "/api/v1/tools/get_holdings", None)).await;
    assert_eq!(status, 200);
    assert_eq!(holdings["count"], 0);
    assert_eq!(holdings["totals"]["cash_balance"], json!(100000.0));

    let (_, missing) = send(
        &app,
        request(Method::POST, "/api/v1/tools/add_to_portfolio", None),
    )
    .await;
    assert_eq!(missing["error"], "validation_error");
}
