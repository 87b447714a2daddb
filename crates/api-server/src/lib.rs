//! Tickerboard API server
//!
//! Thin axum layer over the dashboard orchestrator: JSON endpoints for the
//! stock summary and news panels, permissive CORS for the browser client,
//! request ids and security headers on every response.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method, StatusCode,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dashboard_orchestrator::DashboardOrchestrator;
use finnhub_client::FinnhubClient;
use market_core::{FixtureProvider, MarketDataError, MarketDataProvider};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
mod news_routes;
mod openapi;
mod request_id;
mod security_headers;
mod stock_routes;


pub use config::{DataSource, ServerConfig};
use news_routes::news_routes;
use openapi::ApiDoc;
use request_id::request_id_middleware;
use security_headers::security_headers_middleware;
use stock_routes::stock_routes;

/// Request headers browsers may send cross-origin
const CORS_ALLOWED_HEADERS: [&str; 2] = ["x-client-info", "apikey"];

#[derive(Clone)]
pub struct AppState {
    /// `None` when live data was requested without a Finnhub key
    pub orchestrator: Option<Arc<DashboardOrchestrator>>,
}

impl AppState {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            orchestrator: Some(Arc::new(DashboardOrchestrator::new(provider))),
        }
    }

    pub fn unconfigured() -> Self {
        Self { orchestrator: None }
    }

    /// Pick the provider the config asks for.
    pub fn from_config(config: &ServerConfig) -> Self {
        match config.data_source {
            DataSource::Fixture => {
                tracing::info!("Serving fixture data for {:?}", FixtureProvider::symbols());
                Self::new(Arc::new(FixtureProvider::new()))
            }
            DataSource::Live => match &config.finnhub_api_key {
                Some(key) => {
                    tracing::info!("Serving live data from {}", config.finnhub_base_url);
                    Self::new(Arc::new(FinnhubClient::with_base_url(
                        key.clone(),
                        &config.finnhub_base_url,
                        config.upstream_timeout,
                    )))
                }
                None => {
                    tracing::warn!(
                        "FINNHUB_API_KEY not set: data endpoints will answer 503 until configured"
                    );
                    Self::unconfigured()
                }
            },
        }
    }

    pub fn orchestrator(&self) -> Result<&DashboardOrchestrator, AppError> {
        self.orchestrator.as_deref().ok_or_else(|| {
            MarketDataError::ConfigurationMissing("FINNHUB_API_KEY not configured".to_string())
                .into()
        })
    }

    pub fn data_source_name(&self) -> &'static str {
        self.orchestrator
            .as_ref()
            .map(|o| o.provider_name())
            .unwrap_or("unconfigured")
    }
}

/// Error envelope returned to clients: `{"error": "..."}`
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn with_status(status: StatusCode, error: anyhow::Error) -> Self {
        Self { status, error }
    }

    pub fn bad_request(rejection: JsonRejection) -> Self {
        Self::with_status(
            StatusCode::BAD_REQUEST,
            anyhow::anyhow!("Invalid request body: {}", rejection.body_text()),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// HTTP status for each failure kind
pub fn status_for(error: &MarketDataError) -> StatusCode {
    match error {
        MarketDataError::ConfigurationMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
        MarketDataError::SymbolNotFound(_) => StatusCode::NOT_FOUND,
        MarketDataError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        MarketDataError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
    }
}

impl From<MarketDataError> for AppError {
    fn from(e: MarketDataError) -> Self {
        Self::with_status(status_for(&e), e.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "Request failed: {:#}", self.error);
        } else {
            tracing::warn!(status = %self.status, "Request rejected: {:#}", self.error);
        }

        (
            self.status,
            Json(json!({
                "error": self.error.to_string(),
            })),
        )
            .into_response()
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub data_source: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Server is up", body = HealthStatus)),
    tag = "System"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        data_source: state.data_source_name().to_string(),
    })
}

fn cors_layer() -> CorsLayer {
    let mut headers = vec![AUTHORIZATION, CONTENT_TYPE];
    headers.extend(CORS_ALLOWED_HEADERS.into_iter().map(HeaderName::from_static));

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(headers)
}

pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(stock_routes())
        .merge(news_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(middleware::from_fn_with_state(
                    config.enable_hsts,
                    security_headers_middleware,
                )),
        )
        .with_state(state)
}

pub fn init_tracing(json_logging: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "api_server=info,dashboard_orchestrator=info,finnhub_client=info,tower_http=info".into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if json_logging {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();
    init_tracing(config.json_logging);
    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }
    tracing::info!("Starting Tickerboard API with {:?}", config);

    let state = AppState::from_config(&config);
    let app = build_router(state, &config);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
