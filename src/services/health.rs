use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::database::connection::DatabaseManager;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub database: DatabaseHealth,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub connection_pool_size: u32,
    pub response_time_ms: u64,
    /// Number of tasks currently waiting to fire.
    pub scheduled_tasks: i64,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub start_time: DateTime<Utc>,
}

pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        let state = AppState {
            db,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();

    let (db_status, scheduled_tasks) = match count_scheduled_tasks(&state.db).await {
        Ok(count) => ("healthy", count),
        Err(_) => ("unhealthy", 0),
    };

    let response_time_ms = start.elapsed().as_millis() as u64;
    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds() as u64;

    let health_response = HealthResponse {
        status: db_status.to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: db_status.to_string(),
            connection_pool_size: state.db.pool.size(),
            response_time_ms,
            scheduled_tasks,
        },
        uptime_seconds: uptime,
    };

    if health_response.status == "healthy" {
        Ok(Json(health_response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    // Ready only when the store answers queries.
    match count_scheduled_tasks(&state.db).await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    // If this endpoint responds, the service is alive.
    Json("alive")
}

async fn count_scheduled_tasks(db: &DatabaseManager) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks")
        .fetch_one(&db.pool)
        .await
}
