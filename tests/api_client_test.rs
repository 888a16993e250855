//! Integration tests for the API client with a mock server.
//!
//! Verifies:
//! - Every request carries the `CLIENT_TOKEN` header
//! - Status mapping (401/403, 4xx/5xx, malformed bodies)
//! - Request bodies and query strings for the main endpoints

mod common;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rainforest::RainforestError;
use rainforest::core::ApiClient;
use rainforest::core::models::{ResourceKind, RunParams, TestFilters, TestSelection};

use common::logger::TestLogger;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), "secret-token", Duration::from_secs(5)).expect("client build")
}

// =============================================================================
// Authentication and status mapping
// =============================================================================

#[tokio::test]
async fn requests_carry_token_header() {
    let log = TestLogger::new("requests_carry_token_header");
    log.phase("setup");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sites"))
        .and(header("CLIENT_TOKEN", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Production"},
            {"id": 2, "name": "Staging"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    log.phase("execute");
    log.http_request("GET", &format!("{}/sites", server.uri()));
    let sites = client(&server)
        .list(ResourceKind::Sites)
        .await
        .expect("list should succeed");

    log.phase("verify");
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].id, Some(1));
    assert_eq!(sites[1].label(), "Staging");
    log.finish_ok();
}

#[tokio::test]
async fn unauthorized_maps_to_auth_invalid() {
    let log = TestLogger::new("unauthorized_maps_to_auth_invalid");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browsers"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "bad token"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .list(ResourceKind::Browsers)
        .await
        .unwrap_err();
    assert!(matches!(err, RainforestError::AuthInvalid { status: 401 }), "{err:?}");
    assert_eq!(err.error_code(), "RF-A002");
    log.finish_ok();
}

#[tokio::test]
async fn server_error_carries_api_message() {
    let log = TestLogger::new("server_error_carries_api_message");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/runs/9"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "database down"})))
        .mount(&server)
        .await;

    let err = client(&server).get_run(9).await.unwrap_err();
    match &err {
        RainforestError::Api { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "database down");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(err.is_retryable());
    log.finish_ok();
}

#[tokio::test]
async fn not_found_is_not_retryable() {
    let log = TestLogger::new("not_found_is_not_retryable");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/runs/404/tests"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such run"))
        .mount(&server)
        .await;

    let err = client(&server).run_tests(404).await.unwrap_err();
    assert!(matches!(err, RainforestError::Api { status: 404, .. }), "{err:?}");
    assert!(!err.is_retryable());
    log.finish_ok();
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let log = TestLogger::new("malformed_body_is_parse_error");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tests/rfml_ids"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).rfml_ids().await.unwrap_err();
    assert!(matches!(err, RainforestError::ParseResponse(_)), "{err:?}");
    log.finish_ok();
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    let log = TestLogger::new("connection_refused_is_network_error");

    // Nothing listens on port 1.
    let api =
        ApiClient::new("http://127.0.0.1:1", "tok", Duration::from_secs(2)).expect("client build");
    let err = api.list(ResourceKind::Sites).await.unwrap_err();
    assert!(matches!(err, RainforestError::Network(_)), "{err:?}");
    assert!(err.is_retryable());
    log.finish_ok();
}

#[tokio::test]
async fn slow_response_maps_to_timeout() {
    let log = TestLogger::new("slow_response_maps_to_timeout");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/features"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri(), "tok", Duration::from_secs(1)).expect("client build");
    let err = api.list(ResourceKind::Features).await.unwrap_err();
    assert!(matches!(err, RainforestError::Timeout(1)), "{err:?}");
    log.finish_ok();
}

// =============================================================================
// Endpoints
// =============================================================================

#[tokio::test]
async fn create_run_posts_selection() {
    let log = TestLogger::new("create_run_posts_selection");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs"))
        .and(body_json(json!({
            "tests": [12, 34],
            "tags": ["smoke"],
            "crowd": "automation"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 77,
            "state": "queued",
            "frontend_url": "https://app.example/runs/77"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = RunParams {
        tests: Some(TestSelection::Ids(vec![12, 34])),
        tags: vec!["smoke".to_string()],
        crowd: Some("automation".to_string()),
        ..RunParams::default()
    };
    let run = client(&server).create_run(&params).await.expect("create run");

    assert_eq!(run.id, 77);
    assert_eq!(run.state, "queued");
    assert!(!run.is_terminal());
    log.finish_ok();
}

#[tokio::test]
async fn rfml_ids_decodes_mappings() {
    let log = TestLogger::new("rfml_ids_decodes_mappings");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tests/rfml_ids"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "rfml_id": "login"},
            {"id": 6, "rfml_id": "checkout"}
        ])))
        .mount(&server)
        .await;

    let mappings = client(&server).rfml_ids().await.expect("rfml ids");
    let ids: Vec<_> = mappings.iter().map(|m| (m.id, m.rfml_id.as_str())).collect();
    assert_eq!(ids, vec![(5, "login"), (6, "checkout")]);
    log.finish_ok();
}

#[tokio::test]
async fn list_tests_sends_filters_as_query() {
    let log = TestLogger::new("list_tests_sends_filters_as_query");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tests"))
        .and(query_param("tags", "smoke,auth"))
        .and(query_param("site_id", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "rfml_id": "home", "title": "Home page"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let filters = TestFilters {
        tags: vec!["smoke".to_string(), "auth".to_string()],
        site_id: Some(3),
        smart_folder_id: None,
    };
    let tests = client(&server).list_tests(&filters).await.expect("list tests");
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].title, "Home page");
    log.finish_ok();
}

#[tokio::test]
async fn delete_accepts_empty_body() {
    let log = TestLogger::new("delete_accepts_empty_body");

    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tests/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_test(5).await.expect("delete");
    log.finish_ok();
}

#[tokio::test]
async fn batch_rows_wraps_data() {
    let log = TestLogger::new("batch_rows_wraps_data");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generators/3/batch"))
        .and(body_json(json!({"data": [{"11": "alice"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut row = serde_json::Map::new();
    row.insert("11".to_string(), json!("alice"));
    client(&server)
        .batch_rows(3, &[row])
        .await
        .expect("batch rows");
    log.finish_ok();
}
