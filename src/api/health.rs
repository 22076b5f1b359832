use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::{ConnectionTrait, Statement};
use serde_json::json;

use crate::infrastructure::AppState;

/// Reports whether the lending store answers a trivial query.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service and database are reachable"),
        (status = 503, description = "Database is unreachable")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db = state.db();
    let probe = Statement::from_string(db.get_database_backend(), "SELECT 1".to_owned());

    let (status, database) = match db.query_one(probe).await {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!("Health check failed to reach database: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unreachable")
        }
    };

    (
        status,
        Json(json!({
            "status": if status.is_success() { "ok" } else { "degraded" },
            "service": "campus-library",
            "database": database,
            "loan_period_days": state.policy.loan_period_days,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
