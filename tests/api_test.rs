use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use campus_library::domain::LoanPolicy;
use campus_library::infrastructure::AppState;
use campus_library::{db, seed, server};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create the full application over a seeded in-memory database
async fn setup_test_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    seed::seed_demo_data(&db).await.expect("Failed to seed");
    server::build_router(AppState::new(db, LoanPolicy::default()), &[])
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let req = match body {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app().await;
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "campus-library");
    assert_eq!(body["database"], "ok");
    assert_eq!(body["loan_period_days"], 15);
}

#[tokio::test]
async fn test_issue_and_return_over_http() {
    let app = setup_test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/loans/issue",
        Some(json!({
            "staff_id": 1,
            "borrower_kind": "student",
            "borrower_id": 4,
            "copy_ids": [1, 2]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["loan"]["copies"].as_array().unwrap().len(), 2);
    assert_eq!(body["loan"]["borrower"]["kind"], "student");

    // Loans made through the API are dated today and due after the default period
    let today = chrono::Local::now().date_naive();
    let due = today + chrono::Days::new(15);
    assert_eq!(body["loan"]["issue_date"], today.to_string());
    assert_eq!(body["loan"]["copies"][0]["due_date"], due.to_string());

    let (status, body) = send(&app, "GET", "/api/books/1/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["copies"][0]["status"], "UNAVAILABLE");
    assert!(body["copies"][0]["due_date"].is_string());
    assert_eq!(body["copies"][2]["status"], "AVAILABLE");

    // Issuing an issued copy conflicts
    let (status, body) = send(
        &app,
        "POST",
        "/api/loans/issue",
        Some(json!({
            "staff_id": 1,
            "borrower_kind": "professor",
            "borrower_id": 2,
            "copy_ids": [2]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("copy 2"));

    let (status, body) = send(
        &app,
        "POST",
        "/api/loans/return",
        Some(json!({ "copy_ids": [1], "tampered": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["return"]["fines"][0]["reason"], "tampered");
    assert_eq!(body["return"]["returned"][0]["status"], "AVAILABLE");

    assert_eq!(body["return"]["returned_on"], today.to_string());

    let (status, body) = send(&app, "GET", "/api/borrowers/student/4/loans", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    let loans = body["loans"].as_array().unwrap();
    let copy_1 = loans.iter().find(|l| l["copy_id"] == 1).unwrap();
    let copy_2 = loans.iter().find(|l| l["copy_id"] == 2).unwrap();
    assert_eq!(copy_1["return_date"], today.to_string());
    assert_eq!(copy_1["issue_date"], today.to_string());
    assert!(copy_2["return_date"].is_null());

    let (status, body) = send(&app, "GET", "/api/reports/impact/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_error_statuses() {
    let app = setup_test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/loans/issue",
        Some(json!({
            "staff_id": 1,
            "borrower_kind": "student",
            "borrower_id": 1,
            "copy_ids": [9999]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/loans/issue",
        Some(json!({
            "staff_id": 1,
            "borrower_kind": "student",
            "borrower_id": 1,
            "copy_ids": []
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/loans/return",
        Some(json!({ "copy_ids": [3] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "GET", "/api/reports/impact/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/books/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/staff/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/borrowers/professor/9/loans", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_impact_without_activity_has_message() {
    let app = setup_test_app().await;

    let (status, body) = send(&app, "GET", "/api/reports/impact/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["rows"].as_array().unwrap().is_empty());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_catalog_endpoints() {
    let app = setup_test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/departments",
        Some(json!({ "name": "Civil" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let dept_id = body["department"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/books",
        Some(json!({ "title": "Surveying", "department_id": dept_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let book_id = body["book"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/books/{}/copies", book_id),
        Some(json!({
            "purchase_date": "2024-01-10",
            "publication_date": "2020-06-01",
            "price": -5.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/books/{}/copies", book_id),
        Some(json!({
            "purchase_date": "2024-01-10",
            "publication_date": "2020-06-01",
            "price": 520.0,
            "edition": 3.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["copy"]["status"], "AVAILABLE");

    let (status, body) = send(&app, "GET", "/api/staff/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["staff"]["name"], "Staff-2");

    let (status, body) = send(&app, "GET", &format!("/api/books/{}/copies", book_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    let (status, _) = send(
        &app,
        "POST",
        "/api/borrowers",
        Some(json!({ "kind": "student", "name": "Late Joiner", "department_id": dept_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Malformed JSON is rejected by the extractor
    let req = Request::builder()
        .uri("/api/staff")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("invalid json"))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
