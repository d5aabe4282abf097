//! Tool arguments, result envelopes and definitions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{DatabaseError, Error};
use crate::holdings::Holding;
use crate::ledger::{HoldingInput, PositionUpdate, TransactionHistoryQuery};

pub const ADD_TO_PORTFOLIO: &str = "add_to_portfolio";
pub const REMOVE_FROM_PORTFOLIO: &str = "remove_from_portfolio";
pub const UPDATE_POSITION: &str = "update_position";
pub const GET_HOLDINGS: &str = "get_holdings";
pub const GET_TRANSACTION_HISTORY: &str = "get_transaction_history";

// ============================================================================
// Tool Arguments
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AddToPortfolioArgs {
    pub ticker: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    /// ISO-8601 date, defaults to now.
    pub purchase_date: Option<String>,
    pub notes: Option<String>,
}

impl From<AddToPortfolioArgs> for HoldingInput {
    fn from(args: AddToPortfolioArgs) -> Self {
        HoldingInput {
            ticker: args.ticker,
            quantity: args.quantity,
            purchase_price: args.purchase_price,
            purchase_date: args.purchase_date,
            notes: args.notes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoveFromPortfolioArgs {
    pub position_id: String,
    /// Shares to sell; the whole position when absent.
    pub quantity: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePositionArgs {
    pub position_id: String,
    pub notes: Option<String>,
    pub purchase_price: Option<Decimal>,
}

impl From<UpdatePositionArgs> for PositionUpdate {
    fn from(args: UpdatePositionArgs) -> Self {
        PositionUpdate {
            notes: args.notes,
            purchase_price: args.purchase_price,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetHoldingsArgs {
    pub filter_ticker: Option<String>,
    #[serde(default = "default_include_totals")]
    pub include_totals: bool,
}

fn default_include_totals() -> bool {
    true
}

impl Default for GetHoldingsArgs {
    fn default() -> Self {
        Self {
            filter_ticker: None,
            include_totals: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetTransactionHistoryArgs {
    pub ticker: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub transaction_type: Option<String>,
    pub limit: Option<i64>,
}

impl From<GetTransactionHistoryArgs> for TransactionHistoryQuery {
    fn from(args: GetTransactionHistoryArgs) -> Self {
        TransactionHistoryQuery {
            ticker: args.ticker,
            start_date: args.start_date,
            end_date: args.end_date,
            transaction_type: args.transaction_type,
            limit: args.limit,
        }
    }
}

// ============================================================================
// Result Envelopes
// ============================================================================

/// Failure category reported to tool callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    ValidationError,
    InsufficientFunds,
    NotFound,
    InternalError,
}

impl From<&Error> for ToolErrorKind {
    fn from(err: &Error) -> Self {
        match err {
            Error::Validation(_) => ToolErrorKind::ValidationError,
            Error::InsufficientFunds(_) => ToolErrorKind::InsufficientFunds,
            Error::ItemNotFound(_) | Error::Database(DatabaseError::NotFound(_)) => {
                ToolErrorKind::NotFound
            }
            Error::Database(_) | Error::Unexpected(_) => ToolErrorKind::InternalError,
        }
    }
}

/// `{success: false, error, message}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFailure {
    pub success: bool,
    pub error: ToolErrorKind,
    pub message: String,
}

impl ToolFailure {
    pub fn new(error: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error,
            message: message.into(),
        }
    }
}

impl From<Error> for ToolFailure {
    fn from(err: Error) -> Self {
        ToolFailure::new(ToolErrorKind::from(&err), err.to_string())
    }
}

/// Success payload of a mutating tool, flattened next to `success: true`.
#[derive(Debug, Clone, Serialize)]
pub struct Acknowledged<T> {
    pub success: bool,
    #[serde(flatten)]
    pub inner: T,
}

impl<T> Acknowledged<T> {
    pub fn new(inner: T) -> Self {
        Self {
            success: true,
            inner,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionPayload {
    pub holding: Holding,
}

/// Either the tool's payload or the failure envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ToolResponse<T> {
    Ok(T),
    Err(ToolFailure),
}

impl<T> ToolResponse<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, ToolResponse::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            ToolResponse::Ok(value) => Some(value),
            ToolResponse::Err(_) => None,
        }
    }

    pub fn err(self) -> Option<ToolFailure> {
        match self {
            ToolResponse::Ok(_) => None,
            ToolResponse::Err(failure) => Some(failure),
        }
    }
}

impl<T> From<crate::Result<T>> for ToolResponse<T> {
    fn from(result: crate::Result<T>) -> Self {
        match result {
            Ok(value) => ToolResponse::Ok(value),
            Err(err) => ToolResponse::Err(err.into()),
        }
    }
}

// ============================================================================
// Definitions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}
