//! Stock Summary Routes
//!
//! Price, change, valuation and price history for one ticker.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use market_core::{StockSummary, TimePeriod};
use serde::Deserialize;

use crate::{AppError, AppState, ErrorBody};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StockDataRequest {
    /// Ticker symbol, case-insensitive
    pub symbol: String,
    /// One of 1M, 3M, 6M, 1Y, 3Y, 5Y, 10Y; anything else means 1Y
    #[serde(default)]
    pub period: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PeriodQuery {
    /// One of 1M, 3M, 6M, 1Y, 3Y, 5Y, 10Y; anything else means 1Y
    pub period: Option<String>,
}

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/api/stock-data", post(post_stock_data))
        .route("/api/stocks/:symbol", get(get_stock_data))
}

// ─── Handlers ───────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/api/stock-data",
    request_body = StockDataRequest,
    responses(
        (status = 200, description = "Stock summary", body = StockSummary),
        (status = 400, description = "Malformed body or symbol", body = ErrorBody),
        (status = 404, description = "Unknown symbol", body = ErrorBody),
        (status = 502, description = "Upstream call failed", body = ErrorBody),
        (status = 503, description = "Market data key not configured", body = ErrorBody),
    ),
    tag = "Stocks"
)]
pub async fn post_stock_data(
    State(state): State<AppState>,
    payload: Result<Json<StockDataRequest>, JsonRejection>,
) -> Result<Json<StockSummary>, AppError> {
    let Json(req) = payload.map_err(AppError::bad_request)?;
    summary(&state, &req.symbol, req.period.as_deref()).await
}

#[utoipa::path(
    get,
    path = "/api/stocks/{symbol}",
    params(("symbol" = String, Path, description = "Stock ticker symbol"), PeriodQuery),
    responses(
        (status = 200, description = "Stock summary", body = StockSummary),
        (status = 404, description = "Unknown symbol", body = ErrorBody),
        (status = 502, description = "Upstream call failed", body = ErrorBody),
    ),
    tag = "Stocks"
)]
pub async fn get_stock_data(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<StockSummary>, AppError> {
    summary(&state, &symbol, query.period.as_deref()).await
}

async fn summary(
    state: &AppState,
    symbol: &str,
    period: Option<&str>,
) -> Result<Json<StockSummary>, AppError> {
    let period = period.unwrap_or_else(|| TimePeriod::default().token());
    let summary = state
        .orchestrator()?
        .get_stock_summary(symbol, period)
        .await?;
    Ok(Json(summary))
}
