use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use super::error_response;
use crate::infrastructure::AppState;
use crate::services;

#[utoipa::path(
    get,
    path = "/api/reports/impact/{department_id}",
    params(("department_id" = i32, Path, description = "Department owning the books")),
    responses(
        (status = 200, description = "Loans of the department's books to other departments"),
        (status = 404, description = "Department not found")
    )
)]
pub async fn impact_report(
    State(state): State<AppState>,
    Path(department_id): Path<i32>,
) -> impl IntoResponse {
    match services::impact(state.db(), department_id).await {
        Ok(rows) if rows.is_empty() => Json(json!({
            "rows": rows,
            "message": "No cross-department activity for this department"
        }))
        .into_response(),
        Ok(rows) => Json(json!({ "rows": rows })).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/books/{id}/status",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Status of every copy"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_status(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match services::check_status(state.db(), id).await {
        Ok(rows) => Json(json!({ "book_id": id, "copies": rows })).into_response(),
        Err(e) => error_response(e),
    }
}
