use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use canopy_client::fetch_feature_flags;

#[tokio::test]
async fn flags_come_from_the_backend() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feature-flags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "summarization": true,
            "rag-feature": true,
            "content-creation": false,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let flags = fetch_feature_flags(&client, &server.uri()).await;

    assert!(flags.summarization_enabled());
    assert!(flags.rag_enabled());
    assert!(!flags.content_creation_enabled());
    // absent flags keep their defaults
    assert!(!flags.assignment_scoring_enabled());
}

#[tokio::test]
async fn server_error_degrades_to_empty_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feature-flags"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let flags = fetch_feature_flags(&client, &server.uri()).await;

    assert!(!flags.any_enabled());
    assert!(flags.summarization_enabled());
}

#[tokio::test]
async fn unreachable_backend_degrades_to_empty_mapping() {
    let client = reqwest::Client::new();
    let flags = fetch_feature_flags(&client, "http://127.0.0.1:1").await;

    assert!(!flags.any_enabled());
}

#[tokio::test]
async fn bad_json_degrades_to_empty_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feature-flags"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let flags = fetch_feature_flags(&client, &server.uri()).await;

    assert!(!flags.any_enabled());
}
