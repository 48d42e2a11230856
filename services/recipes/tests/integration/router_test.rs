//! Routing, identity and middleware checks. The database is never connected,
//! so only paths that fail before touching it are exercised here.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;

use foodgram_recipes::router::build_router;
use foodgram_recipes::state::AppState;
use foodgram_testing::auth::MockAuth;

fn app() -> Router {
    build_router(AppState {
        db: DatabaseConnection::default(),
        media_root: std::env::temp_dir().join("foodgram-router-test"),
        media_url: "/media/".into(),
    })
}

fn json_request(method: Method, uri: &str, auth: Option<&MockAuth>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        for (name, value) in auth.headers().iter() {
            builder = builder.header(name, value);
        }
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn should_answer_healthz_with_request_id() {
    let response = app()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let response = app()
        .oneshot(Request::get("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_require_identity_to_create_recipe() {
    let request = json_request(
        Method::POST,
        "/api/recipes",
        None,
        json!({"name": "Soup", "text": "Boil.", "cooking_time": 10}),
    );
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_recipe_without_ingredients() {
    let auth = MockAuth::user();
    let request = json_request(
        Method::POST,
        "/api/recipes",
        Some(&auth),
        json!({
            "name": "Soup",
            "text": "Boil.",
            "cooking_time": 10,
            "ingredients": [],
            "tags": [1]
        }),
    );
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["kind"], "EMPTY_INGREDIENTS");
}

#[tokio::test]
async fn should_reject_subscribing_to_self() {
    let auth = MockAuth::user();
    let uri = format!("/api/users/{}/subscribe", auth.user_id);
    let request = json_request(Method::POST, &uri, Some(&auth), json!({}));
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["kind"], "SELF_FOLLOW");
}

#[tokio::test]
async fn should_require_identity_for_shopping_list() {
    let response = app()
        .oneshot(
            Request::get("/api/recipes/download_shopping_cart")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_keep_caller_request_id() {
    let response = app()
        .oneshot(
            Request::get("/healthz")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn should_reject_oversized_recipes_limit() {
    let auth = MockAuth::user();
    let mut request = Request::get("/api/users/subscriptions?recipes_limit=18446744073709551615");
    for (name, value) in auth.headers().iter() {
        request = request.header(name, value);
    }
    let response = app()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["kind"], "MISSING_DATA");
}
