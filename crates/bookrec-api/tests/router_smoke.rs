use axum::{body::Body, http::Request, http::StatusCode};
use bookrec_api::{AppConfig, AppState, SharedState, create_router};
use bookrec_common::{Book, Catalog, DataProvider, Rating, RatingTable};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

fn fixture_state() -> SharedState {
    let catalog = Catalog::new([
        Book::new("X", "author x", "Роман", 1900),
        Book::new("Y", "author y", "Драма", 1910),
        Book::new("Z", "author z", "Повість", 1920),
    ]);
    let ratings: RatingTable = [
        ("A", "X", 5),
        ("A", "Y", 3),
        ("B", "X", 4),
        ("B", "Z", 5),
        ("C", "Y", 2),
        ("C", "Z", 4),
    ]
    .into_iter()
    .map(|(u, i, s)| Rating::new(u, i, s).unwrap())
    .collect();

    AppState::new(
        DataProvider::from_parts(catalog, ratings),
        AppConfig::for_tests(),
    )
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let response = create_router(fixture_state())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn livez_and_readyz_are_ok() {
    let (status, body) = get_json("/livez").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get_json("/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["application"], "bookrec-api");
}

#[tokio::test]
async fn readyz_returns_service_unavailable_when_not_ready() {
    let state = fixture_state();
    state
        .readiness
        .store(false, std::sync::atomic::Ordering::SeqCst);

    let response = create_router(state)
        .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn recommends_unseen_items_with_metadata() {
    let (status, body) = get_json("/api/users/A/recommendations?n=2").await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Z");
    assert_eq!(items[0]["author"], "author z");
    assert_eq!(items[0]["predicted_score"], 4.5);
    assert_eq!(items[0]["support"], 2);
}

#[tokio::test]
async fn non_positive_count_and_unknown_user_yield_empty_list() {
    for uri in [
        "/api/users/A/recommendations?n=0",
        "/api/users/A/recommendations?n=-3",
        "/api/users/D/recommendations",
    ] {
        let (status, body) = get_json(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, Value::Array(Vec::new()), "{uri}");
    }
}

#[tokio::test]
async fn user_ratings_join_catalog_and_404_for_unknown_user() {
    let (status, body) = get_json("/api/users/A/ratings").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["X", "Y"]);
    assert_eq!(body[0]["rating"], 5);
    assert_eq!(body[0]["genre"], "Роман");

    let (status, body) = get_json("/api/users/nobody/ratings").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn lists_users_books_and_stats() {
    let (_, users) = get_json("/api/users").await;
    assert_eq!(users["users"], serde_json::json!(["A", "B", "C"]));

    let (_, books) = get_json("/api/books").await;
    assert_eq!(books.as_array().unwrap().len(), 3);

    let (status, stats) = get_json("/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["user_count"], 3);
    assert_eq!(stats["rating_count"], 6);
    assert_eq!(stats["mean_rating"], 3.83);
    assert_eq!(stats["distribution"][0], serde_json::json!({"score": 2, "count": 1}));
}

#[tokio::test]
async fn malformed_count_returns_json_bad_request() {
    let response = create_router(fixture_state())
        .oneshot(
            Request::builder()
                .uri("/api/users/A/recommendations?n=abc")
                .header("x-request-id", "req-n-abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "bad_request");
    assert_eq!(body["request_id"], "req-n-abc");
    assert!(body["message"].as_str().unwrap().contains("query string"));
}
