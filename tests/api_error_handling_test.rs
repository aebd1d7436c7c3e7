use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use estate_pilot::db;
use estate_pilot::server;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test app
async fn setup_test_app() -> (Router, DatabaseConnection) {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    (server::build_router(db.clone()), db)
}

async fn create_test_partner(db: &DatabaseConnection) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let partner = estate_pilot::models::partner::ActiveModel {
        name: Set("Alice".to_string()),
        email: Set(None),
        phone: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = partner.insert(db).await.expect("Failed to create partner");
    res.id
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _db) = setup_test_app().await;

    let response = app
        .oneshot(empty_request("GET", "/api/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_property_not_found() {
    let (app, _db) = setup_test_app().await;

    let response = app
        .oneshot(empty_request("GET", "/api/properties/999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_property_validation() {
    let (app, _db) = setup_test_app().await;

    // non-positive expected price is a validation error
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/properties",
            serde_json::json!({ "name": "Bad House", "expected_price": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // a valid payload is created
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/properties",
            serde_json::json!({ "name": "Good House", "expected_price": 100000.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_sold_twice_is_a_bad_request() {
    let (app, _db) = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/properties",
            serde_json::json!({ "name": "Sold House", "expected_price": 100000.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/api/properties/1/sold"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(empty_request("POST", "/api/properties/1/sold"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_low_offer_is_a_bad_request() {
    let (app, db) = setup_test_app().await;
    let partner_id = create_test_partner(&db).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/properties",
            serde_json::json!({ "name": "Bidding House", "expected_price": 100000.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/offers",
            serde_json::json!({ "property_id": 1, "partner_id": partner_id, "price": 95000.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/offers",
            serde_json::json!({ "property_id": 1, "partner_id": partner_id, "price": 90000.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_garden_defaults_endpoint() {
    let (app, _db) = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/properties/garden-defaults?garden=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(empty_request(
            "GET",
            "/api/properties/garden-defaults?garden=false",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_tag_name_is_rejected() {
    let (app, _db) = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tags",
            serde_json::json!({ "name": "cozy", "color": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/tags",
            serde_json::json!({ "name": "cozy" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "The tag already in use");
}

#[tokio::test]
async fn test_database_errors_are_not_swallowed() {
    // A connection without migrations: every query hits a missing table,
    // which must surface as a 500, not an empty 200 or a 404
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect");
    let app = server::build_router(db);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/tags"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/partners"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app
        .oneshot(empty_request("GET", "/api/property-types/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
