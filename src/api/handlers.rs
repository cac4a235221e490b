use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use super::{ApiError, ApiResult, AppState};
use crate::constants::DEFAULT_TOP_N;
use crate::utils::checksum;

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub addresses: Option<Vec<String>>,
}

/// `n` query parameter; missing or unparsable falls back to the default,
/// anything not positive selects nothing.
fn requested_count(params: &HashMap<String, String>) -> usize {
    let n = params
        .get("n")
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_TOP_N);
    usize::try_from(n).unwrap_or(0)
}

pub async fn get_balance(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    let address = params
        .get("address")
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Address parameter required".to_string()))?;
    let analyzer = state.analyzer()?;

    let (balance, balance_wei) = analyzer.get_balance(address).await;
    Ok(Json(json!({
        "address": address,
        "balance": balance,
        "balanceWei": balance_wei.to_string(),
        "symbol": analyzer.symbol(),
    })))
}

pub async fn get_balance_batch(
    State(state): State<AppState>,
    payload: Option<Json<BatchRequest>>,
) -> ApiResult<Json<Value>> {
    let addresses = payload
        .and_then(|Json(body)| body.addresses)
        .ok_or_else(|| ApiError::BadRequest("addresses array required".to_string()))?;
    let analyzer = state.analyzer()?;

    let balances = analyzer.get_balance_batch(&addresses).await;
    Ok(Json(json!({
        "addresses": addresses,
        "balances": balances,
        "symbol": analyzer.symbol(),
    })))
}

pub async fn get_top(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    let analyzer = state.analyzer()?;
    let top: Vec<(String, f64)> = analyzer
        .get_top(requested_count(&params))
        .await
        .into_iter()
        .map(|h| (h.checksum_address(), h.display))
        .collect();

    Ok(Json(json!({
        "count": top.len(),
        "top": top,
        "symbol": analyzer.symbol(),
    })))
}

pub async fn get_top_with_transactions(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    let analyzer = state.analyzer()?;
    let top: Vec<(String, f64, Option<String>)> = analyzer
        .get_top_with_transactions(requested_count(&params))
        .await
        .into_iter()
        .map(|h| (h.holder.checksum_address(), h.holder.display, h.last_tx_formatted()))
        .collect();

    Ok(Json(json!({
        "count": top.len(),
        "top": top,
        "symbol": analyzer.symbol(),
    })))
}

pub async fn get_token_info(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    let analyzer = state.analyzer()?;
    let info = analyzer.get_token_info(params.get("address").map(String::as_str)).await;
    let body = match info {
        Some(info) => serde_json::to_value(info).map_err(|e| ApiError::Internal(e.to_string()))?,
        None => json!({}),
    };
    Ok(Json(body))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let (connected, symbol) = match state.analyzer() {
        Ok(analyzer) => (analyzer.is_connected().await, Some(analyzer.symbol().to_string())),
        Err(_) => (false, None),
    };
    Json(json!({
        "status": "healthy",
        "connected": connected,
        "token_address": checksum(&state.token_address),
        "symbol": symbol,
    }))
}

pub async fn metrics(State(state): State<AppState>) -> ApiResult<String> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| ApiError::NotFound("Metrics recorder not installed".to_string()))
}
