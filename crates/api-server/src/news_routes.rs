use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use market_core::NewsFeed;
use serde::Deserialize;

use crate::{AppError, AppState, ErrorBody};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StockNewsRequest {
    pub symbol: String,
}

pub fn news_routes() -> Router<AppState> {
    Router::new()
        .route("/api/stock-news", post(post_stock_news))
        .route("/api/stocks/:symbol/news", get(get_stock_news))
}

/// Latest company news, newest first as the upstream returns it, at most ten items.
#[utoipa::path(
    post,
    path = "/api/stock-news",
    request_body = StockNewsRequest,
    responses(
        (status = 200, description = "Recent company news", body = NewsFeed),
        (status = 400, description = "Malformed body or symbol", body = ErrorBody),
        (status = 502, description = "Upstream call failed", body = ErrorBody),
        (status = 503, description = "Market data key not configured", body = ErrorBody),
    ),
    tag = "News"
)]
pub async fn post_stock_news(
    State(state): State<AppState>,
    payload: Result<Json<StockNewsRequest>, JsonRejection>,
) -> Result<Json<NewsFeed>, AppError> {
    let Json(req) = payload.map_err(AppError::bad_request)?;
    news(&state, &req.symbol).await
}

#[utoipa::path(
    get,
    path = "/api/stocks/{symbol}/news",
    params(("symbol" = String, Path, description = "Stock ticker symbol")),
    responses(
        (status = 200, description = "Recent company news", body = NewsFeed),
        (status = 502, description = "Upstream call failed", body = ErrorBody),
    ),
    tag = "News"
)]
pub async fn get_stock_news(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<NewsFeed>, AppError> {
    news(&state, &symbol).await
}

async fn news(state: &AppState, symbol: &str) -> Result<Json<NewsFeed>, AppError> {
    let news = state.orchestrator()?.get_news(symbol).await?;
    Ok(Json(NewsFeed { news }))
}
