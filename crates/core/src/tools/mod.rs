//! Tools module - named operations with uniform success/failure envelopes.

mod portfolio_tools;
mod tools_model;

#[cfg(test)]
mod portfolio_tools_tests;

pub use portfolio_tools::PortfolioTools;
pub use tools_model::{
    Acknowledged, AddToPortfolioArgs, GetHoldingsArgs, GetTransactionHistoryArgs,
    PositionPayload, RemoveFromPortfolioArgs, ToolDefinition, ToolErrorKind, ToolFailure,
    ToolResponse, UpdatePositionArgs, ADD_TO_PORTFOLIO, GET_HOLDINGS, GET_TRANSACTION_HISTORY,
    REMOVE_FROM_PORTFOLIO, UPDATE_POSITION,
};
