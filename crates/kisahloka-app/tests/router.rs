use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use kisahloka_app::{
    rest_api::api_router,
    state::{AppConfig, AppState},
};
use serde_json::{json, Value};
use sqlx::Executor as _;
use tower::ServiceExt as _;

async fn test_router(default_page_size: u64) -> Router {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    pool.execute("PRAGMA foreign_keys = ON").await.unwrap();
    kisahloka_dal::MIGRATOR.run(&pool).await.unwrap();
    api_router().with_state(AppState::new(AppConfig { default_page_size }, pool))
}

async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    call_raw(router, method, uri, body.map(|b| b.to_string())).await
}

async fn call_raw(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body)),
        None => request.body(Body::empty()),
    }
    .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_configured_page_size() {
    let router = test_router(2).await;
    for name in ["Sumatera", "Jawa", "Bali"] {
        let (status, body) = call(&router, "POST", "/origin", Some(json!({"origin_name": name}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["error"], "");
    }

    let (status, body) = call(&router, "GET", "/origin", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["meta"],
        json!({"limit": 2, "page": 1, "total_page": 2, "total_items": 3})
    );

    let (status, body) = call(&router, "GET", "/origin?page=3", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn test_error_envelope() {
    let router = test_router(10).await;

    let (status, body) = call(&router, "GET", "/type/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"data": null, "error": "StoryType not found"}));

    let (status, body) = call(&router, "PUT", "/role/7", Some(json!({"role_name": "admin"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rows_affected"], 0);


    let (status, body) = call(&router, "GET", "/home", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["story_types"], json!([]));
}

#[tokio::test]
async fn test_rejections_use_envelope() {
    let router = test_router(10).await;

    let (status, body) = call(&router, "GET", "/story/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"], Value::Null);
    assert!(body["error"].as_str().unwrap().contains("abc"));

    let (status, body) = call(&router, "POST", "/genre", Some(json!({"genre_name": ""}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["data"], Value::Null);
    assert!(body["error"].as_str().unwrap().contains("genre_name"));

    let (status, body) = call_raw(&router, "POST", "/genre", Some("{bad".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"], Value::Null);
    assert!(!body["error"].as_str().unwrap().is_empty());

    let keyword = "k".repeat(256);
    let (status, body) = call(&router, "GET", &format!("/genre?keyword={keyword}"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("keyword"));

    let (status, body) = call(&router, "PUT", "/role/x", Some(json!({"role_name": "admin"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"], Value::Null);
}
