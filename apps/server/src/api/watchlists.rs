use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use ledgerfolio_core::watchlists::Watchlist;
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateWatchlistRequest {
    pub name: String,
    #[serde(default)]
    pub tickers: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWatchlistRequest {
    pub name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddTickerRequest {
    pub ticker: String,
}

async fn list_watchlists(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Watchlist>>> {
    let watchlists = state.watchlist_service.list_watchlists(&state.user_id)?;
    Ok(Json(watchlists))
}

async fn create_watchlist(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateWatchlistRequest>,
) -> ApiResult<(StatusCode, Json<Watchlist>)> {
    let created = state
        .watchlist_service
        .create_watchlist(
            &payload.name,
            &payload.tickers,
            payload.notes.as_deref(),
            &state.user_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_watchlist(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Watchlist>> {
    let watchlist = state.watchlist_service.get_watchlist(&id, &state.user_id)?;
    Ok(Json(watchlist))
}

async fn update_watchlist(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateWatchlistRequest>,
) -> ApiResult<Json<Watchlist>> {
    let updated = state
        .watchlist_service
        .update_watchlist(
            &id,
            payload.name.as_deref(),
            payload.notes.as_deref(),
            &state.user_id,
        )
        .await?;
    Ok(Json(updated))
}

async fn delete_watchlist(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state
        .watchlist_service
        .delete_watchlist(&id, &state.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_ticker(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddTickerRequest>,
) -> ApiResult<Json<Watchlist>> {
    let updated = state
        .watchlist_service
        .add_ticker(&id, &payload.ticker, &state.user_id)
        .await?;
    Ok(Json(updated))
}

async fn remove_ticker(
    Path((id, ticker)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Watchlist>> {
    let updated = state
        .watchlist_service
        .remove_ticker(&id, &ticker, &state.user_id)
        .await?;
    Ok(Json(updated))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/watchlists", get(list_watchlists).post(create_watchlist))
        .route(
            "/watchlists/{id}",
            get(get_watchlist)
                .put(update_watchlist)
                .delete(delete_watchlist),
        )
        .route("/watchlists/{id}/tickers", post(add_ticker))
        .route("/watchlists/{id}/tickers/{ticker}", delete(remove_ticker))
}
