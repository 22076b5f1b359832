//! Catalog API handlers using the repository pattern

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::error_response;
use crate::domain::{CreateBookInput, CreateBorrowerInput, CreateCopyInput, DomainError, Missing};
use crate::infrastructure::AppState;

/// Request DTO for entities that only carry a name
#[derive(Debug, Deserialize, ToSchema)]
pub struct NameRequest {
    pub name: String,
}

#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = NameRequest,
    responses(
        (status = 201, description = "Department created", body = crate::domain::Department),
        (status = 400, description = "Invalid name")
    )
)]
pub async fn create_department(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> impl IntoResponse {
    match state.catalog.create_department(payload.name).await {
        Ok(department) => (StatusCode::CREATED, Json(json!({ "department": department })))
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    params(("id" = i32, Path, description = "Department id")),
    responses(
        (status = 200, description = "Department found", body = crate::domain::Department),
        (status = 404, description = "Department not found")
    )
)]
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.catalog.find_department(id).await {
        Ok(Some(department)) => Json(json!({ "department": department })).into_response(),
        Ok(None) => error_response(DomainError::NotFound(Missing::Department)),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/staff",
    request_body = NameRequest,
    responses((status = 201, description = "Staff member created"))
)]
pub async fn create_staff(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> impl IntoResponse {
    match state.catalog.create_staff(payload.name).await {
        Ok(staff) => (StatusCode::CREATED, Json(json!({ "staff": staff }))).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    params(("id" = i32, Path, description = "Staff id")),
    responses(
        (status = 200, description = "Staff member found", body = crate::domain::Staff),
        (status = 404, description = "Staff member not found")
    )
)]
pub async fn get_staff(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match state.catalog.find_staff(id).await {
        Ok(Some(staff)) => Json(json!({ "staff": staff })).into_response(),
        Ok(None) => error_response(DomainError::NotFound(Missing::Staff)),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/borrowers",
    request_body = CreateBorrowerInput,
    responses(
        (status = 201, description = "Borrower registered"),
        (status = 404, description = "Department not found")
    )
)]
pub async fn create_borrower(
    State(state): State<AppState>,
    Json(payload): Json<CreateBorrowerInput>,
) -> impl IntoResponse {
    match state.catalog.create_borrower(payload).await {
        Ok(borrower) => {
            (StatusCode::CREATED, Json(json!({ "borrower": borrower }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/authors",
    request_body = NameRequest,
    responses((status = 201, description = "Author created"))
)]
pub async fn create_author(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> impl IntoResponse {
    match state.catalog.create_author(payload.name).await {
        Ok(author) => (StatusCode::CREATED, Json(json!({ "author": author }))).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/books",
    request_body = CreateBookInput,
    responses(
        (status = 201, description = "Book created", body = crate::domain::Book),
        (status = 404, description = "Department not found")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookInput>,
) -> impl IntoResponse {
    match state.catalog.create_book(payload).await {
        Ok(book) => (StatusCode::CREATED, Json(json!({ "book": book }))).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book found", body = crate::domain::Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match state.catalog.find_book(id).await {
        Ok(Some(book)) => Json(json!({ "book": book })).into_response(),
        Ok(None) => error_response(DomainError::NotFound(Missing::Book)),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/books/{id}/copies",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Copies of the book, ordered by id"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_copies(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match state.catalog.find_book(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(DomainError::NotFound(Missing::Book)),
        Err(e) => return error_response(e),
    }

    match state.catalog.list_copies(id).await {
        Ok(copies) => Json(json!({ "total": copies.len(), "copies": copies })).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/books/{id}/copies",
    params(("id" = i32, Path, description = "Book id")),
    request_body = CreateCopyInput,
    responses(
        (status = 201, description = "Copy added"),
        (status = 400, description = "Negative price"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn add_copy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CreateCopyInput>,
) -> impl IntoResponse {
    match state.catalog.add_copy(id, payload).await {
        Ok(copy) => (
            StatusCode::CREATED,
            Json(json!({ "copy": copy, "message": "Copy added successfully" })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
