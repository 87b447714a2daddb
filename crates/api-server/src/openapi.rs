use utoipa::OpenApi;

use crate::{news_routes, stock_routes, ErrorBody, HealthStatus};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tickerboard API",
        description = "Stock summaries and company news for the dashboard, backed by Finnhub"
    ),
    paths(
        crate::health,
        stock_routes::post_stock_data,
        stock_routes::get_stock_data,
        news_routes::post_stock_news,
        news_routes::get_stock_news,
    ),
    components(schemas(
        ErrorBody,
        HealthStatus,
        stock_routes::StockDataRequest,
        news_routes::StockNewsRequest,
        market_core::StockSummary,
        market_core::PricePoint,
        market_core::AnalystRating,
        market_core::Prediction,
        market_core::NewsFeed,
        market_core::NewsArticle,
    )),
    tags(
        (name = "Stocks", description = "Price summary and history"),
        (name = "News", description = "Company news feed"),
        (name = "System", description = "Liveness"),
    )
)]
pub struct ApiDoc;
