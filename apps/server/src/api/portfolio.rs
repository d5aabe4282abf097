use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use ledgerfolio_core::portfolios::Portfolio;

use crate::{error::ApiResult, main_lib::AppState};

/// Cash state of the configured portfolio, created on first access.
async fn get_portfolio(State(state): State<Arc<AppState>>) -> ApiResult<Json<Portfolio>> {
    let portfolio = state
        .ledger
        .get_or_create_portfolio(&state.portfolio_id)
        .await?;
    Ok(Json(portfolio))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/portfolio", get(get_portfolio))
}
