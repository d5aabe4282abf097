use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use ledgerfolio_core::tools::{PortfolioTools, ToolDefinition};
use serde_json::Value;

use crate::main_lib::AppState;

async fn list_tools() -> Json<Vec<ToolDefinition>> {
    Json(PortfolioTools::definitions())
}

/// Runs one tool. Business failures come back as the tool's own failure
/// envelope with a 200 status; a missing body means no arguments.
async fn call_tool(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Option<Json<Value>>,
) -> Json<Value> {
    let args = body.map(|Json(inner)| inner).unwrap_or(Value::Null);
    Json(state.tools.call(&name, args).await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(call_tool))
}
