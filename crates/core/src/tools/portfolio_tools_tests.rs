//! Tests for the portfolio tool boundary.

#[cfg(test)]
mod tests {
    use crate::holdings::Holding;
    use crate::ledger::LedgerService;
    use crate::portfolios::Portfolio;
    use crate::repository::InMemoryRepository;
    use crate::tools::*;
    use crate::transactions::Transaction;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn tools() -> PortfolioTools {
        let ledger = LedgerService::new(
            Arc::new(InMemoryRepository::<Holding>::new()),
            Arc::new(InMemoryRepository::<Transaction>::new()),
            Arc::new(InMemoryRepository::<Portfolio>::new()),
        );
        PortfolioTools::new(Arc::new(ledger), "default")
    }

    async fn buy_aapl(tools: &PortfolioTools) -> Value {
        tools
            .call(
                ADD_TO_PORTFOLIO,
                json!({"ticker": "aapl", "quantity": 10, "purchase_price": 150.0}),
            )
            .await
    }

    #[tokio::test]
    async fn test_buy_then_partial_sell_scenario() {
        let tools = tools();
        let bought = buy_aapl(&tools).await;

        assert_eq!(bought["success"], true);
        assert_eq!(bought["holding"]["ticker"], "AAPL");
        assert_eq!(bought["holding"]["quantity"], json!(10.0));
        assert_eq!(bought["transaction"]["type"], "buy");
        assert_eq!(bought["transaction"]["total"], json!(-1500.0));
        assert_eq!(bought["total_cost"], json!(1500.0));
        assert_eq!(bought["new_cash_balance"], json!(98500.0));

        let position_id = bought["holding"]["id"].as_str().unwrap().to_string();
        let sold = tools
            .call(
                REMOVE_FROM_PORTFOLIO,
                json!({"position_id": position_id, "quantity": 4}),
            )
            .await;

        assert_eq!(sold["success"], true);
        assert_eq!(sold["quantity_sold"], json!(4.0));
        assert_eq!(sold["proceeds"], json!(600.0));
        assert_eq!(sold["new_cash_balance"], json!(99100.0));
        assert_eq!(sold["holding_removed"], false);
        assert_eq!(sold["remaining_quantity"], json!(6.0));
        assert_eq!(sold["transaction"]["type"], "sell");
    }

    #[tokio::test]
    async fn test_insufficient_funds_envelope() {
        let tools = tools();
        let response = tools
            .call(
                ADD_TO_PORTFOLIO,
                json!({"ticker": "AAPL", "quantity": 1000000, "purchase_price": 150.0}),
            )
            .await;

        assert_eq!(response["success"], false);
        assert_eq!(response["error"], "insufficient_funds");
        assert!(response["message"].as_str().unwrap().starts_with("Insufficient funds"));

        let holdings = tools.call(GET_HOLDINGS, Value::Null).await;
        assert_eq!(holdings["count"], 0);
        assert_eq!(holdings["totals"]["cash_balance"], json!(100000.0));
    }

    #[tokio::test]
    async fn test_update_unknown_position_is_not_found() {
        let tools = tools();
        let response = tools
            .call(
                UPDATE_POSITION,
                json!({"position_id": "nonexistent-id", "notes": "x"}),
            )
            .await;
        assert_eq!(response["success"], false);
        assert_eq!(response["error"], "not_found");
    }

    #[tokio::test]
    async fn test_update_position_success_shape() {
        let tools = tools();
        let bought = buy_aapl(&tools).await;
        let position_id = bought["holding"]["id"].as_str().unwrap();

        let response = tools
            .call(
                UPDATE_POSITION,
                json!({"position_id": position_id, "purchase_price": 140.5}),
            )
            .await;
        assert_eq!(response["success"], true);
        assert_eq!(response["holding"]["purchase_price"], json!(140.5));
    }

    #[tokio::test]
    async fn test_validation_error_envelope() {
        let tools = tools();
        let response = tools
            .call(
                ADD_TO_PORTFOLIO,
                json!({"ticker": "TOOLONGTICKER", "quantity": 1, "purchase_price": 1.0}),
            )
            .await;
        assert_eq!(response["success"], false);
        assert_eq!(response["error"], "validation_error");
        assert!(response["message"]
            .as_str()
            .unwrap()
            .contains("Invalid ticker format"));
    }

    #[tokio::test]
    async fn test_oversized_purchase_is_a_validation_error() {
        let tools = tools();
        let response = tools
            .call(
                ADD_TO_PORTFOLIO,
                json!({"ticker": "AAPL", "quantity": 1e20, "purchase_price": 1e10}),
            )
            .await;
        assert_eq!(response["success"], false);
        assert_eq!(response["error"], "validation_error");
        assert_eq!(
            response["message"],
            "Input validation failed: Purchase total is too large"
        );

        let holdings = tools.call(GET_HOLDINGS, json!({})).await;
        assert_eq!(holdings["count"], 0);
        assert_eq!(holdings["totals"]["cash_balance"], json!(100000.0));
    }

    #[tokio::test]
    async fn test_malformed_arguments_are_validation_errors() {
        let tools = tools();
        let missing = tools
            .call(ADD_TO_PORTFOLIO, json!({"ticker": "AAPL"}))
            .await;
        assert_eq!(missing["error"], "validation_error");

        let wrong_type = tools
            .call(REMOVE_FROM_PORTFOLIO, json!({"position_id": 12}))
            .await;
        assert_eq!(wrong_type["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let response = tools().call("delete_everything", json!({})).await;
        assert_eq!(response["success"], false);
        assert_eq!(response["error"], "not_found");
    }

    #[tokio::test]
    async fn test_read_tools_have_no_success_flag() {
        let tools = tools();
        buy_aapl(&tools).await;

        let holdings = tools
            .call(GET_HOLDINGS, json!({"include_totals": false}))
            .await;
        assert_eq!(holdings["count"], 1);
        assert!(holdings.get("success").is_none());
        assert!(holdings.get("totals").is_none());

        let history = tools
            .call(
                GET_TRANSACTION_HISTORY,
                json!({"ticker": "aapl", "transaction_type": "buy", "limit": 500}),
            )
            .await;
        assert_eq!(history["count"], 1);
        assert_eq!(history["filters"]["ticker"], "AAPL");
        assert_eq!(history["filters"]["transaction_type"], "BUY");
        assert_eq!(history["filters"]["limit"], 200);
        assert_eq!(history["filters"]["start_date"], Value::Null);
    }

    #[tokio::test]
    async fn test_typed_methods() {
        let tools = tools();
        let response = tools
            .add_to_portfolio(AddToPortfolioArgs {
                ticker: "MSFT".to_string(),
                quantity: dec!(2),
                purchase_price: dec!(300),
                purchase_date: Some("2024-01-02".to_string()),
                notes: None,
            })
            .await;
        assert!(response.is_ok());
        let outcome = response.ok().unwrap().inner;
        assert_eq!(outcome.new_cash_balance, dec!(99400));

        let failure = tools
            .remove_from_portfolio(RemoveFromPortfolioArgs {
                position_id: outcome.holding.id.clone(),
                quantity: Some(dec!(3)),
            })
            .await
            .err()
            .unwrap();
        assert_eq!(failure.error, ToolErrorKind::ValidationError);
        assert!(!failure.success);
    }

    #[test]
    fn test_definitions_cover_every_tool() {
        let names: Vec<String> = PortfolioTools::definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(
            names,
            vec![
                ADD_TO_PORTFOLIO,
                REMOVE_FROM_PORTFOLIO,
                UPDATE_POSITION,
                GET_HOLDINGS,
                GET_TRANSACTION_HISTORY
            ]
        );
        for definition in PortfolioTools::definitions() {
            assert_eq!(definition.parameters["type"], "object");
        }
    }
}
