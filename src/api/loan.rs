use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use super::error_response;
use crate::domain::{BorrowerKind, BorrowerRef};
use crate::infrastructure::AppState;
use crate::services::{self, IssueRequest, ReturnRequest};

#[utoipa::path(
    post,
    path = "/api/loans/issue",
    request_body = IssueRequest,
    responses(
        (status = 201, description = "Copies issued", body = crate::services::LoanReceipt),
        (status = 400, description = "No copies requested"),
        (status = 404, description = "Unknown borrower, staff or copy"),
        (status = 409, description = "A copy is not available")
    )
)]
pub async fn issue_copies(
    State(state): State<AppState>,
    Json(payload): Json<IssueRequest>,
) -> impl IntoResponse {
    match services::issue(state.db(), &state.policy, payload).await {
        Ok(receipt) => (StatusCode::CREATED, Json(json!({ "loan": receipt }))).into_response(),
        Err(e) => {
            tracing::debug!("Issue rejected: {}", e);
            error_response(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/loans/return",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Copies returned", body = crate::services::ReturnSummary),
        (status = 404, description = "Unknown copy"),
        (status = 409, description = "A copy is not on loan")
    )
)]
pub async fn return_copies(
    State(state): State<AppState>,
    Json(payload): Json<ReturnRequest>,
) -> impl IntoResponse {
    match services::return_copies(state.db(), payload).await {
        Ok(summary) => Json(json!({ "return": summary })).into_response(),
        Err(e) => {
            tracing::debug!("Return rejected: {}", e);
            error_response(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/borrowers/{kind}/{id}/loans",
    params(
        ("kind" = BorrowerKind, Path, description = "student or professor"),
        ("id" = i32, Path, description = "Borrower id")
    ),
    responses(
        (status = 200, description = "Loan history"),
        (status = 404, description = "Borrower not found")
    )
)]
pub async fn borrower_loans(
    State(state): State<AppState>,
    Path((kind, id)): Path<(BorrowerKind, i32)>,
) -> impl IntoResponse {
    let borrower = BorrowerRef { kind, id };
    match services::borrower_history(state.db(), borrower).await {
        Ok(rows) => Json(json!({
            "borrower": borrower,
            "total": rows.len(),
            "loans": rows
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}
