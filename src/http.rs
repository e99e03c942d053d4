use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::classifier;
use crate::config::CoreConfig;
use crate::telemetry::{ApiPrediction, StatsSnapshot, TelemetryStore};

pub const SERVICE_NAME: &str = "VoltGuard Power Quality Analyzer";

#[derive(Clone)]
pub struct ApiState {
    pub telemetry: Arc<TelemetryStore>,
    pub config: Arc<CoreConfig>,
}

#[derive(Debug, Serialize)]
struct RootResponse {
    message: String,
    version: String,
    status: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    stats: StatsSnapshot,
    recent_predictions: Vec<ApiPrediction>,
}

#[derive(Debug, Serialize)]
struct PredictionResponse {
    prediction: u8,
    confidence: f32,
    class_name: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    detail: String,
}

pub async fn serve(addr: String, state: ApiState) -> Result<(), Box<dyn std::error::Error>> {
    let cors = cors_layer(&state.config.cors_origin);
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/predict_sample", post(predict))
        .route("/generate_test", post(generate_test))
        .with_state(state)
        .layer(cors);

    let addr: SocketAddr = addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to the VoltGuard API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
    })
}

async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let stats = state.telemetry.snapshot_stats().await;
    let recent_predictions = state.telemetry.recent_predictions().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        stats,
        recent_predictions,
    })
}

async fn predict(
    State(state): State<ApiState>,
    Json(data): Json<Vec<f32>>,
) -> Result<Json<PredictionResponse>, (StatusCode, Json<ErrorDetail>)> {
    let outcome = classifier::classify(&data, &mut rand::thread_rng());
    match outcome {
        Ok(result) => {
            state.telemetry.record_prediction(&result).await;
            if state.config.log_requests {
                println!(
                    "[API] /predict class={} confidence={:.2}",
                    result.class.as_id(),
                    result.confidence
                );
            }

            Ok(Json(PredictionResponse {
                prediction: result.class.as_id(),
                confidence: result.confidence,
                class_name: result.class.label().to_string(),
                message: "prediction successful".to_string(),
            }))
        }
        Err(error) => {
            state.telemetry.record_rejected().await;
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorDetail {
                    detail: error.to_string(),
                }),
            ))
        }
    }
}

async fn generate_test(State(state): State<ApiState>) -> Json<Vec<f32>> {
    let sample = classifier::generate_sample(state.config.noise_scale, &mut rand::thread_rng());
    state.telemetry.record_sample().await;
    if state.config.log_requests {
        println!("[API] /generate_test points={}", sample.len());
    }

    Json(sample)
}

fn cors_layer(allowed: &str) -> CorsLayer {
    let mut cors = if allowed.trim() == "*" {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = allowed
            .split(',')
            .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    cors = cors.allow_methods([Method::GET, Method::POST]);
    cors.allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
