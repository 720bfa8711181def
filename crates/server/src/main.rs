//! DeviceRevive Server
//!
//! Axum server exposing the aggregation pipeline. Three routes: a health
//! check, the main scrape endpoint, and a standalone trade-in valuation
//! for the landing page. The whole-request deadline lives here, not in
//! the pipeline.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use revive_core::ai::valuation::generate_eco_valuation;
use revive_core::ai::vision::analyze_device_images;
use revive_core::ai::ChatClient;
use revive_core::config::{LlmConfig, PipelineConfig};
use revive_core::error::ReviveError;
use revive_core::pipeline::Pipeline;
use revive_core::schemas::{
    DeviceContext, EcoValuation, EcoValuationRequest, Mode, ScrapeRequest, ScrapeResponse,
};
use revive_core::search::SearchAdapter;

const DEFAULT_SCRAPE_DEADLINE_SECS: u64 = 120;
const VALUATION_DEADLINE_SECS: u64 = 60;

#[derive(Parser)]
#[command(name = "revive", about = "DeviceRevive aggregation service")]
struct Args {
    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Bind port
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

/// Application state
struct AppState {
    pipeline: Pipeline,
    chat: ChatClient,
    scrape_deadline: Duration,
    valuation_deadline: Duration,
}

type SharedState = Arc<AppState>;

/// Maps service failures onto HTTP status codes
struct ApiError(ReviveError);

impl From<ReviveError> for ApiError {
    fn from(e: ReviveError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            ReviveError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ReviveError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            ReviveError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    llm_configured: bool,
    timestamp: i64,
}

/// Health check for the frontend proxy
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        llm_configured: state.chat.is_configured(),
        timestamp: epoch_millis(),
    })
}

/// Main scraping endpoint: run the full pipeline under the outer deadline
async fn scrape(
    State(state): State<SharedState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    tracing::info!(
        "Scrape request: device={} conditions={:?} mode={}",
        request.device_name,
        request.conditions,
        request.mode.label(),
    );

    if !state.chat.is_configured() {
        return Err(ReviveError::NotConfigured.into());
    }

    let ctx: DeviceContext = request.into();
    match tokio::time::timeout(state.scrape_deadline, state.pipeline.run(&ctx)).await {
        Ok(response) => {
            tracing::info!(
                "Scrape complete: {} recommendations",
                response.recommendations.len()
            );
            Ok(Json(response))
        }
        Err(_) => {
            tracing::error!("Scrape timed out after {}s", state.scrape_deadline.as_secs());
            Err(ReviveError::DeadlineExceeded(state.scrape_deadline.as_secs()).into())
        }
    }
}

/// Standalone Eco-Exchange valuation: no scraping, optional vision pass
async fn eco_valuation(
    State(state): State<SharedState>,
    Json(request): Json<EcoValuationRequest>,
) -> Result<Json<EcoValuation>, ApiError> {
    tracing::info!(
        "Eco valuation request: device={} conditions={:?}",
        request.device_name,
        request.conditions,
    );

    if !state.chat.is_configured() {
        return Err(ReviveError::NotConfigured.into());
    }

    let work = async {
        // Vision findings only ever add free-text signal; a failed
        // analysis never blocks the valuation
        let mut notes = request.additional_notes.clone();
        if !request.images.is_empty() {
            if let Some(report) =
                analyze_device_images(&state.chat, &request.images, &request.device_name).await
            {
                if notes.trim().is_empty() {
                    notes = report.as_notes();
                } else {
                    notes = format!("{} {}", notes, report.as_notes());
                }
            }
        }

        let ctx = DeviceContext {
            device: request.device_name.clone(),
            conditions: request.conditions.clone(),
            mode: Mode::Standard,
            device_type: request.device_type.clone(),
            ram_gb: request.ram_gb,
            storage_gb: request.storage_gb,
            condition_notes: String::new(),
        };
        generate_eco_valuation(&state.chat, &ctx, &notes).await
    };

    match tokio::time::timeout(state.valuation_deadline, work).await {
        Ok(Some(valuation)) => Ok(Json(valuation)),
        Ok(None) => Err(ReviveError::Internal(anyhow::anyhow!(
            "AI valuation returned no result"
        ))
        .into()),
        Err(_) => Err(ReviveError::DeadlineExceeded(state.valuation_deadline.as_secs()).into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let llm = LlmConfig::from_env();
    if llm.is_configured() {
        println!("GROQ_API_KEY is configured. Scraper ready.");
    } else {
        eprintln!("⚠️ GROQ_API_KEY is not set! AI generation will be unavailable.");
    }

    let scrape_deadline = Duration::from_secs(
        std::env::var("SCRAPER_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SCRAPE_DEADLINE_SECS),
    );

    let chat = ChatClient::new(llm)?;
    let search = Arc::new(SearchAdapter::from_env());
    let pipeline = Pipeline::new(search, chat.clone(), PipelineConfig::from_env());

    let state: SharedState = Arc::new(AppState {
        pipeline,
        chat,
        scrape_deadline,
        valuation_deadline: Duration::from_secs(VALUATION_DEADLINE_SECS),
    });

    let app = Router::new()
        .route("/health", get(health))
        .route("/scrape", post(scrape))
        .route("/eco-valuation", post(eco_valuation))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    println!("🚀 DeviceRevive Server running at http://{}", addr);
    println!("   Routes:");
    println!("   Health:    GET  /health");
    println!("   Scrape:    POST /scrape");
    println!("   Valuation: POST /eco-valuation");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
