use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::{appointment_routes, AppState};
use shared_config::AppConfig;
use shared_database::HttpDocumentStore;

const DOCUMENTS_PATH: &str = "/databases/clinic/collections/appointments/documents";

fn test_app(store_endpoint: &str) -> (Router, Arc<AppState>) {
    let config = Arc::new(AppConfig {
        store_endpoint: store_endpoint.to_string(),
        store_project_id: "test-project".to_string(),
        store_api_key: "test-key".to_string(),
        database_id: "clinic".to_string(),
        appointment_collection_id: "appointments".to_string(),
    });
    let store = Arc::new(HttpDocumentStore::new(&config));
    let state = Arc::new(AppState::new(config, store));
    (appointment_routes(state.clone()), state)
}

fn stored_doc(id: &str, status: &str) -> Value {
    json!({
        "$id": id,
        "$createdAt": "2026-08-20T10:00:00.000Z",
        "$updatedAt": "2026-08-20T10:00:00.000Z",
        "userId": "u1",
        "patient": "p1",
        "primaryPhysician": "Dr. A",
        "schedule": "2026-09-01T10:00:00.000Z",
        "reason": "checkup",
        "note": "bring previous records",
        "status": status,
    })
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn create_appointment_returns_success_envelope() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DOCUMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_doc("a1", "pending")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (app, _state) = test_app(&mock_server.uri());
    let request_body = json!({
        "userId": "u1",
        "patient": "p1",
        "primaryPhysician": "Dr. A",
        "schedule": (Utc::now() + Duration::hours(24)).to_rfc3339(),
        "reason": "checkup",
    });

    let response = app
        .oneshot(json_request("POST", "/", request_body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["appointment"]["status"], json!("pending"));
    assert_eq!(body["appointment"]["$id"], json!("a1"));
}

#[tokio::test]
async fn create_without_patient_is_rejected_before_the_store() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (app, _state) = test_app(&mock_server.uri());
    let request_body = json!({
        "userId": "u1",
        "primaryPhysician": "Dr. A",
        "schedule": (Utc::now() + Duration::hours(24)).to_rfc3339(),
        "reason": "checkup",
    });

    let response = app
        .oneshot(json_request("POST", "/", request_body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cancel_transition_succeeds_and_signals_the_dashboard() {
    let mock_server = MockServer::start().await;
    let document_path = format!("{}/a1", DOCUMENTS_PATH);
    Mock::given(method("GET"))
        .and(path(document_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_doc("a1", "pending")))
        .mount(&mock_server)
        .await;
    let mut cancelled = stored_doc("a1", "cancelled");
    cancelled["cancellationReason"] = json!("Patient unavailable");
    Mock::given(method("PATCH"))
        .and(path(document_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(cancelled))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (app, state) = test_app(&mock_server.uri());
    let request_body = json!({
        "userId": "u1",
        "type": "cancel",
        "appointment": { "cancellationReason": "Patient unavailable" },
    });

    let response = app
        .oneshot(json_request("PATCH", "/a1", request_body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["appointment"]["status"], json!("cancelled"));
    assert_eq!(body["message"], json!("Appointment cancelled successfully"));
    assert_eq!(state.dashboard.version(), 1);
}

#[tokio::test]
async fn scheduling_a_cancelled_appointment_is_rejected() {
    let mock_server = MockServer::start().await;
    let document_path = format!("{}/a1", DOCUMENTS_PATH);
    Mock::given(method("GET"))
        .and(path(document_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_doc("a1", "cancelled")))
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (app, state) = test_app(&mock_server.uri());
    let request_body = json!({
        "userId": "u1",
        "type": "schedule",
        "appointment": {
            "primaryPhysician": "Dr. B",
            "schedule": (Utc::now() + Duration::hours(24)).to_rfc3339(),
        },
    });

    let response = app
        .oneshot(json_request("PATCH", "/a1", request_body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.dashboard.version(), 0);
}

#[tokio::test]
async fn unknown_intent_is_rejected_at_the_boundary() {
    let mock_server = MockServer::start().await;
    let (app, _state) = test_app(&mock_server.uri());
    let request_body = json!({
        "userId": "u1",
        "type": "reschedule",
        "appointment": {},
    });

    let response = app
        .oneshot(json_request("PATCH", "/a1", request_body))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn recent_appointments_returns_the_dashboard_report() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCUMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 3,
            "documents": [
                stored_doc("a3", "pending"),
                stored_doc("a2", "scheduled"),
                stored_doc("a1", "cancelled"),
            ],
        })))
        .mount(&mock_server)
        .await;

    let (app, _state) = test_app(&mock_server.uri());
    let response = app
        .oneshot(Request::builder().uri("/recent").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["totalCount"], json!(3));
    assert_eq!(body["pendingCount"], json!(1));
    assert_eq!(body["scheduledCount"], json!(1));
    assert_eq!(body["cancelledCount"], json!(1));
    assert_eq!(body["documents"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn missing_appointment_maps_to_not_found() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Document with the requested ID could not be found."
        })))
        .mount(&mock_server)
        .await;

    let (app, _state) = test_app(&mock_server.uri());
    let response = app
        .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
