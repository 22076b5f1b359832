pub mod catalog;
pub mod health;
pub mod loan;
pub mod report;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;

/// Maps a domain failure onto an HTTP status with a JSON error body
pub fn error_response(e: DomainError) -> Response {
    let status = match &e {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Database(msg) => {
            tracing::error!("Database error: {}", msg);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": e.to_string() }))).into_response()
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Catalog
        .route("/departments", post(catalog::create_department))
        .route("/departments/:id", get(catalog::get_department))
        .route("/staff", post(catalog::create_staff))
        .route("/staff/:id", get(catalog::get_staff))
        .route("/borrowers", post(catalog::create_borrower))
        .route("/authors", post(catalog::create_author))
        .route("/books", post(catalog::create_book))
        .route("/books/:id", get(catalog::get_book))
        .route(
            "/books/:id/copies",
            get(catalog::list_copies).post(catalog::add_copy),
        )
        // Lending
        .route("/loans/issue", post(loan::issue_copies))
        .route("/loans/return", post(loan::return_copies))
        .route("/borrowers/:kind/:id/loans", get(loan::borrower_loans))
        // Reports
        .route("/reports/impact/:department_id", get(report::impact_report))
        .route("/books/:id/status", get(report::book_status))
        .with_state(state)
}
