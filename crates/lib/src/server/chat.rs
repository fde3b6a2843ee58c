//! Chat lookups and the raw block pass-through.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::Value;

use super::{ApiError, AppState};
use crate::aggregator::{BlockReport, PriceQuote};

#[derive(Debug, Deserialize)]
pub(super) struct PriceParams {
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CommandBody {
    #[serde(default)]
    command: Option<String>,
}

/// Handler for GET /api/chat/price?currency=
pub(super) async fn handle_price(
    State(state): State<AppState>,
    Query(params): Query<PriceParams>,
) -> Result<Json<PriceQuote>, ApiError> {
    let currency = params
        .currency
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("Currency is required"))?;

    let quote = state.aggregator.price_quote(&currency).await?;
    Ok(Json(quote))
}

/// Handler for POST /api/chat/blockchain
///
/// A missing or undecodable body is treated the same as a missing command.
pub(super) async fn handle_blockchain(
    State(state): State<AppState>,
    body: Result<Json<CommandBody>, JsonRejection>,
) -> Result<Json<BlockReport>, ApiError> {
    let command = body
        .ok()
        .and_then(|Json(body)| body.command)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("Command is required"))?;

    let report = state.aggregator.block_report(&command).await?;
    Ok(Json(report))
}

/// Handler for GET /api/blockchain/block/{tag}
pub(super) async fn handle_raw_block(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let block = state.aggregator.raw_block(&tag).await?;
    Ok(Json(block))
}
