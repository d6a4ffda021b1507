use axum::http::{header::CONTENT_TYPE, HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use movie_expert::api::{create_router, AppState};
use movie_expert::models::{DatasetContext, DatasetKind, Movie};

fn movie(id: &str, year: i32, genres: &[&str], rating: f64, count: u64) -> Movie {
    Movie::new(
        id,
        format!("Title {} ({})", id, year),
        Some(year),
        genres.iter().map(|g| g.to_string()).collect(),
        rating,
        count,
        5.0,
    )
    .with_popularity(count as f64)
}

fn catalog() -> DatasetContext {
    DatasetContext::new(
        DatasetKind::MovieLens100k,
        vec![
            movie("1", 1995, &["Animation", "Children", "Comedy"], 3.9, 452),
            movie("2", 1977, &["Action", "Adventure", "Romance", "Sci-Fi", "War"], 4.4, 583),
            movie("3", 1994, &["Comedy", "Romance"], 3.6, 90),
            movie("4", 1996, &["Drama"], 4.3, 12),
            movie("5", 1989, &["Horror", "Thriller"], 2.1, 40),
            movie("6", 1972, &["Crime", "Drama"], 4.6, 413),
            movie("7", 1997, &["Comedy", "Drama", "Romance"], 2.6, 7),
        ],
        5.0,
    )
}

fn create_test_server() -> TestServer {
    let state = AppState::new(catalog());
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn create_unavailable_server() -> TestServer {
    let state = AppState::new(DatasetContext::unavailable(
        "Missing dataset files for tmdb_5000: tmdb_5000_movies.csv. Place the files in the data/ folder.",
    ));
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let server = create_test_server();
    let response = server.get("/health").await;
    let request_id = response.header("x-request-id");
    assert!(!request_id.to_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("client-trace-42"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "client-trace-42");
}

#[tokio::test]
async fn test_config_describes_dataset() {
    let server = create_test_server();
    let response = server.get("/api/v1/config").await;
    response.assert_status_ok();

    let config: Value = response.json();
    assert_eq!(config["dataset"], "movielens-100k");
    assert_eq!(config["movies"], 7);
    assert_eq!(config["year_min"], 1972);
    assert_eq!(config["year_max"], 1997);
    assert_eq!(config["rating_scale_max"], 5.0);
    assert_eq!(config["has_popularity"], true);
    assert_eq!(config["has_runtime"], false);
    assert!(config["rules"].as_u64().unwrap() >= 30);
    assert!(config["genres"]
        .as_array()
        .unwrap()
        .contains(&json!("Comedy")));
}

#[tokio::test]
async fn test_recommend_returns_explained_results() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommend")
        .json(&json!({
            "preferred_genres": ["Comedy", "Romance"],
            "min_rating": 3.0
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["summary"]["candidates"], 3);
    assert_eq!(body["summary"]["facts"], 7);
    assert!(body["message"].is_null());

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    let scores: Vec<f64> = results.iter().map(|r| r["score"].as_f64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    for result in results {
        let why = result["why"].as_array().unwrap();
        assert!(!why.is_empty() && why.len() <= 6);
        assert!(result["fired_count"].as_u64().unwrap() as usize >= why.len());
        assert!(result["score"].as_f64().unwrap() > 0.0);
    }
}

#[tokio::test]
async fn test_recommend_truncates_to_top_k() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommend")
        .json(&json!({ "top_k": 3 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["results"].as_array().unwrap().len(), 3);
    assert_eq!(body["summary"]["scored"], 7);
}

#[tokio::test]
async fn test_recommend_accepts_camel_case_fields() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommend")
        .json(&json!({ "excludedGenres": ["Drama"], "yearRange": [1990, 2000] }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let ids: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"1") && ids.contains(&"3"));
}

#[tokio::test]
async fn test_recommend_reports_empty_result_message() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommend")
        .json(&json!({
            "preferred_genres": ["Comedy"],
            "excluded_genres": ["Comedy"]
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["results"].as_array().unwrap().is_empty());
    assert!(body["message"].as_str().unwrap().starts_with("No results"));
}

#[tokio::test]
async fn test_recommend_rejects_malformed_body() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommend")
        .add_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .text("{ not json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_missing_dataset_is_service_unavailable() {
    let server = create_unavailable_server();

    let response = server.get("/api/v1/config").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("tmdb_5000_movies.csv"));

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    server.get("/health").await.assert_status_ok();
}
