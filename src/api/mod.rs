//! HTTP facade over [`TokenAnalyzer`].

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use ethers::types::Address;
use log::error;
use metrics_exporter_prometheus::PrometheusHandle;
use std::{any::Any, sync::Arc};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::analyzer::TokenAnalyzer;

pub mod error;
pub mod handlers;

pub use error::{ApiError, ApiResult};

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    analyzer: Option<Arc<TokenAnalyzer>>,
    token_address: Address,
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn connected(analyzer: Arc<TokenAnalyzer>) -> Self {
        let token_address = analyzer.token().address;
        Self {
            analyzer: Some(analyzer),
            token_address,
            metrics: None,
        }
    }

    /// State for a process that never established an RPC connection.
    /// Only `/health` and `/metrics` answer normally.
    pub fn disconnected(token_address: Address) -> Self {
        Self {
            analyzer: None,
            token_address,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn analyzer(&self) -> ApiResult<&Arc<TokenAnalyzer>> {
        self.analyzer.as_ref().ok_or(ApiError::NotConnected)
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/get_balance", get(handlers::get_balance))
        .route("/get_balance_batch", post(handlers::get_balance_batch))
        .route("/get_top", get(handlers::get_top))
        .route("/get_top_with_transactions", get(handlers::get_top_with_transactions))
        .route("/get_token_info", get(handlers::get_token_info))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    error!("Request handler panicked: {}", details);
    ApiError::Internal(details).into_response()
}
