//! Portfolio tools - the uniform result boundary in front of the ledger.

use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::tools_model::*;
use crate::ledger::{
    BuyOutcome, HoldingsView, LedgerServiceTrait, SellOutcome, TransactionHistory,
};
use crate::Error;

/// Exposes the ledger operations as named tools bound to one portfolio.
///
/// Every call returns either its payload or a `{success: false, error,
/// message}` envelope; errors never escape as `Err`.
#[derive(Clone)]
pub struct PortfolioTools {
    ledger: Arc<dyn LedgerServiceTrait>,
    portfolio_id: String,
}

impl PortfolioTools {
    pub fn new(ledger: Arc<dyn LedgerServiceTrait>, portfolio_id: impl Into<String>) -> Self {
        Self {
            ledger,
            portfolio_id: portfolio_id.into(),
        }
    }

    pub fn portfolio_id(&self) -> &str {
        &self.portfolio_id
    }

    pub async fn add_to_portfolio(
        &self,
        args: AddToPortfolioArgs,
    ) -> ToolResponse<Acknowledged<BuyOutcome>> {
        let result = self.ledger.add_holding(args.into(), &self.portfolio_id).await;
        respond(ADD_TO_PORTFOLIO, result.map(Acknowledged::new))
    }

    pub async fn remove_from_portfolio(
        &self,
        args: RemoveFromPortfolioArgs,
    ) -> ToolResponse<Acknowledged<SellOutcome>> {
        let result = self
            .ledger
            .remove_holding(&args.position_id, args.quantity, &self.portfolio_id)
            .await;
        respond(REMOVE_FROM_PORTFOLIO, result.map(Acknowledged::new))
    }

    pub async fn update_position(
        &self,
        args: UpdatePositionArgs,
    ) -> ToolResponse<Acknowledged<PositionPayload>> {
        let position_id = args.position_id.clone();
        let result = self
            .ledger
            .update_position(&position_id, args.into(), &self.portfolio_id)
            .await;
        respond(
            UPDATE_POSITION,
            result.map(|holding| Acknowledged::new(PositionPayload { holding })),
        )
    }

    pub async fn get_holdings(&self, args: GetHoldingsArgs) -> ToolResponse<HoldingsView> {
        let result = self
            .ledger
            .get_holdings(
                args.filter_ticker.as_deref(),
                args.include_totals,
                &self.portfolio_id,
            )
            .await;
        respond(GET_HOLDINGS, result)
    }

    pub async fn get_transaction_history(
        &self,
        args: GetTransactionHistoryArgs,
    ) -> ToolResponse<TransactionHistory> {
        let result = self
            .ledger
            .get_transaction_history(args.into(), &self.portfolio_id)
            .await;
        respond(GET_TRANSACTION_HISTORY, result)
    }

    /// Dispatches a tool by name with JSON arguments. `null` arguments are
    /// treated as an empty object.
    pub async fn call(&self, name: &str, args: Value) -> Value {
        debug!("Tool call {} on portfolio {}", name, self.portfolio_id);
        match name {
            ADD_TO_PORTFOLIO => match parse_args(name, args) {
                Ok(args) => render(self.add_to_portfolio(args).await),
                Err(failure) => render_failure(failure),
            },
            REMOVE_FROM_PORTFOLIO => match parse_args(name, args) {
                Ok(args) => render(self.remove_from_portfolio(args).await),
                Err(failure) => render_failure(failure),
            },
            UPDATE_POSITION => match parse_args(name, args) {
                Ok(args) => render(self.update_position(args).await),
                Err(failure) => render_failure(failure),
            },
            GET_HOLDINGS => match parse_args(name, args) {
                Ok(args) => render(self.get_holdings(args).await),
                Err(failure) => render_failure(failure),
            },
            GET_TRANSACTION_HISTORY => match parse_args(name, args) {
                Ok(args) => render(self.get_transaction_history(args).await),
                Err(failure) => render_failure(failure),
            },
            unknown => {
                warn!("Unknown tool requested: {}", unknown);
                render_failure(ToolFailure::new(
                    ToolErrorKind::NotFound,
                    format!("Unknown tool: {}", unknown),
                ))
            }
        }
    }

    pub fn definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: ADD_TO_PORTFOLIO.to_string(),
                description: "Buy a new position. The total cost (quantity x purchase price) is \
                              deducted from the portfolio's cash balance and a BUY transaction \
                              is recorded."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "ticker": {
                            "type": "string",
                            "description": "Stock ticker symbol, e.g. AAPL or BRK.B"
                        },
                        "quantity": {
                            "type": "integer",
                            "description": "Number of whole shares to buy",
                            "minimum": 1
                        },
                        "purchase_price": {
                            "type": "number",
                            "description": "Price paid per share",
                            "exclusiveMinimum": 0
                        },
                        "purchase_date": {
                            "type": "string",
                            "description": "Purchase date in ISO format (YYYY-MM-DD), defaults to now"
                        },
                        "notes": {
                            "type": "string",
                            "description": "Optional notes (max 1000 characters)"
                        }
                    },
                    "required": ["ticker", "quantity", "purchase_price"]
                }),
            },
            ToolDefinition {
                name: REMOVE_FROM_PORTFOLIO.to_string(),
                description: "Sell some or all shares of a position. Proceeds are valued at the \
                              position's purchase price and credited to cash."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "position_id": {
                            "type": "string",
                            "description": "Id of the holding to sell"
                        },
                        "quantity": {
                            "type": "integer",
                            "description": "Shares to sell (sells the entire position if omitted)",
                            "minimum": 1
                        }
                    },
                    "required": ["position_id"]
                }),
            },
            ToolDefinition {
                name: UPDATE_POSITION.to_string(),
                description: "Update the notes or cost basis of a position. Does not move cash."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "position_id": {
                            "type": "string",
                            "description": "Id of the holding to update"
                        },
                        "notes": {
                            "type": "string",
                            "description": "New notes; an empty string clears them"
                        },
                        "purchase_price": {
                            "type": "number",
                            "description": "New price per share",
                            "exclusiveMinimum": 0
                        }
                    },
                    "required": ["position_id"]
                }),
            },
            ToolDefinition {
                name: GET_HOLDINGS.to_string(),
                description: "List current holdings with optional totals: amount invested, cash \
                              balance and a per-ticker breakdown."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "filter_ticker": {
                            "type": "string",
                            "description": "Only return holdings for this ticker"
                        },
                        "include_totals": {
                            "type": "boolean",
                            "description": "Include portfolio totals (default: true)",
                            "default": true
                        }
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: GET_TRANSACTION_HISTORY.to_string(),
                description: "Search the transaction ledger, newest first.".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "ticker": {
                            "type": "string",
                            "description": "Filter by ticker"
                        },
                        "start_date": {
                            "type": "string",
                            "description": "Earliest date, inclusive (YYYY-MM-DD)"
                        },
                        "end_date": {
                            "type": "string",
                            "description": "Latest date, inclusive (YYYY-MM-DD)"
                        },
                        "transaction_type": {
                            "type": "string",
                            "description": "Filter by transaction type",
                            "enum": ["BUY", "SELL", "DIVIDEND", "SPLIT", "TRANSFER_IN", "TRANSFER_OUT"]
                        },
                        "limit": {
                            "type": "integer",
                            "description": "Maximum results (default: 50, max: 200)",
                            "default": 50
                        }
                    },
                    "required": []
                }),
            },
        ]
    }
}

fn respond<T>(tool: &str, result: crate::Result<T>) -> ToolResponse<T> {
    if let Err(e) = &result {
        match e {
            Error::Validation(_) | Error::InsufficientFunds(_) | Error::ItemNotFound(_) => {
                warn!("Tool {} rejected: {}", tool, e)
            }
            _ => error!("Tool {} failed: {}", tool, e),
        }
    }
    result.into()
}

fn parse_args<A: DeserializeOwned>(tool: &str, args: Value) -> Result<A, ToolFailure> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|e| {
        warn!("Tool {} called with malformed arguments: {}", tool, e);
        ToolFailure::new(
            ToolErrorKind::ValidationError,
            format!("Invalid arguments for {}: {}", tool, e),
        )
    })
}

fn render<T: Serialize>(response: ToolResponse<T>) -> Value {
    serde_json::to_value(&response).unwrap_or_else(|e| {
        error!("Failed to serialize tool response: {}", e);
        json!({
            "success": false,
            "error": ToolErrorKind::InternalError,
            "message": e.to_string(),
        })
    })
}

fn render_failure(failure: ToolFailure) -> Value {
    render(ToolResponse::<()>::Err(failure))
}
