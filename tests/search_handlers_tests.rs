//! Integration tests for `GET /api/search` with the upstream sources faked by
//! wiremock.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use studymate::test_utils::test_helpers;
use tower::ServiceExt; // for `oneshot`
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLES_PAGE: &str = r#"
<html><body>
  <div class="result results_links web-result">
    <h2 class="result__title">
      <a class="result__a" href="https://www.rust-lang.org/learn">Learn Rust</a>
    </h2>
    <a class="result__snippet" href="https://www.rust-lang.org/learn">Official learning resources.</a>
  </div>
  <div class="result results_links web-result">
    <a class="result__a" href="https://example.com/no-snippet">Missing snippet</a>
  </div>
</body></html>
"#;

const DOCUMENTS_PAGE: &str = r#"
<html><body>
  <div class="result results_links web-result">
    <a class="result__a" href="https://cs.example.edu/ownership.pdf">Ownership (PDF)</a>
    <a class="result__snippet" href="https://cs.example.edu/ownership.pdf">Lecture notes</a>
  </div>
</body></html>
"#;

async fn mount_youtube(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust"))
        .and(query_param("key", "test-key"))
        .and(query_param("type", "video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": {"kind": "youtube#video", "videoId": "long1"}},
                {"id": {"kind": "youtube#video", "videoId": "short1"}},
                {"id": {"kind": "youtube#channel", "channelId": "chan"}}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "long1,short1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "id": "long1",
                    "snippet": {
                        "title": "Rust in 100 minutes",
                        "thumbnails": {
                            "default": {"url": "https://i.ytimg.com/vi/long1/default.jpg"},
                            "high": {"url": "https://i.ytimg.com/vi/long1/hqdefault.jpg"}
                        }
                    },
                    "contentDetails": {"duration": "PT1H40M"}
                },
                {
                    "id": "short1",
                    "snippet": {"title": "Rust in a minute", "thumbnails": {}},
                    "contentDetails": {"duration": "PT59S"}
                }
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_duckduckgo(
    server: &MockServer,
    articles: ResponseTemplate,
    documents: ResponseTemplate,
) {
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "rust"))
        .respond_with(articles)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "rust filetype:pdf"))
        .respond_with(documents)
        .mount(server)
        .await;
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html")
        .set_body_string(body)
}

fn app_for(pool: sqlx::SqlitePool, youtube: &MockServer, duckduckgo: &MockServer) -> Router {
    let config = test_helpers::test_config(&youtube.uri(), &duckduckgo.uri(), Some("test-key"))
        .unwrap();
    test_helpers::create_test_app_with_config(pool, &config)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_search_without_topic_is_bad_request() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let app = test_helpers::create_test_app(pool);

    for uri in ["/api/search", "/api/search?topic=", "/api/search?topic=%20%20"] {
        let (status, body) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, json!({"error": "A 'topic' parameter is required."}));
    }
}

#[tokio::test]
async fn test_malformed_query_string_is_json_bad_request() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let app = test_helpers::create_test_app(pool);

    let (status, body) = get(app, "/api/search?topic=a&topic=b").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("topic"));
}

#[tokio::test]
async fn test_search_merges_all_sources() {
    let youtube = MockServer::start().await;
    let duckduckgo = MockServer::start().await;
    mount_youtube(&youtube).await;
    mount_duckduckgo(&duckduckgo, html(ARTICLES_PAGE), html(DOCUMENTS_PAGE)).await;

    let pool = test_helpers::create_test_db().await.unwrap();
    let (status, body) = get(app_for(pool, &youtube, &duckduckgo), "/api/search?topic=rust").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["videos"],
        json!([{
            "type": "video",
            "source": "YouTube",
            "title": "Rust in 100 minutes",
            "url": "https://www.youtube.com/watch?v=long1",
            "thumbnail": "https://i.ytimg.com/vi/long1/hqdefault.jpg"
        }])
    );
    assert_eq!(
        body["articles"],
        json!([{
            "type": "article",
            "source": "rust-lang.org",
            "title": "Learn Rust",
            "url": "https://www.rust-lang.org/learn",
            "snippet": "Official learning resources."
        }])
    );
    assert_eq!(body["documents"][0]["type"], "document");
    assert_eq!(body["documents"][0]["source"], "cs.example.edu");
    assert_eq!(body["documents"][0]["url"], "https://cs.example.edu/ownership.pdf");
}

#[tokio::test]
async fn test_failing_scrape_source_leaves_others_intact() {
    let youtube = MockServer::start().await;
    let duckduckgo = MockServer::start().await;
    mount_youtube(&youtube).await;
    mount_duckduckgo(
        &duckduckgo,
        ResponseTemplate::new(503),
        html("<html><body><div class=\"result\"><p>garbled"),
    )
    .await;

    let pool = test_helpers::create_test_db().await.unwrap();
    let (status, body) = get(app_for(pool, &youtube, &duckduckgo), "/api/search?topic=rust").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["videos"].as_array().unwrap().len(), 1);
    assert_eq!(body["articles"], json!([]));
    assert_eq!(body["documents"], json!([]));
}

#[tokio::test]
async fn test_rejected_api_key_yields_empty_videos() {
    let youtube = MockServer::start().await;
    let duckduckgo = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "quotaExceeded"}
        })))
        .mount(&youtube)
        .await;
    mount_duckduckgo(&duckduckgo, html(ARTICLES_PAGE), html(DOCUMENTS_PAGE)).await;

    let pool = test_helpers::create_test_db().await.unwrap();
    let (status, body) = get(app_for(pool, &youtube, &duckduckgo), "/api/search?topic=rust").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["videos"], json!([]));
    assert_eq!(body["articles"].as_array().unwrap().len(), 1);
    assert_eq!(body["documents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_without_any_reachable_source_is_empty() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let app = test_helpers::create_test_app(pool);

    let (status, body) = get(app, "/api/search?topic=rust").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"videos": [], "articles": [], "documents": []}));
}
