// ABOUTME: HTTP-level tests for the platform client against a mock server.
// ABOUTME: Checks request shapes, auth header, and error mapping.

use hoist::config::Definition;
use hoist::platform::{
    OptimizationStatus, PlatformClient, PlatformError, PlatformOps, ReleaseInput,
};
use hoist::types::AppName;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app() -> AppName {
    AppName::new("web").unwrap()
}

fn client(server: &MockServer) -> PlatformClient {
    PlatformClient::new(server.uri(), "secret-token").unwrap()
}

#[tokio::test]
async fn validate_config_posts_definition() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/apps/web/config/validate"))
        .and(header("authorization", "Bearer secret-token"))
        .and(body_json(json!({ "definition": { "services": [] } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "definition": { "services": [], "kill_timeout": 5 },
            "errors": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut definition = Definition::new();
    definition.insert("services".to_string(), json!([]));

    let result = client(&server)
        .validate_config(&app(), &definition)
        .await
        .unwrap();

    assert!(result.valid);
    assert_eq!(result.definition["kill_timeout"], 5);
}

#[tokio::test]
async fn validation_errors_are_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/apps/web/config/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": false,
            "errors": ["services must not be empty"]
        })))
        .mount(&server)
        .await;

    let result = client(&server)
        .validate_config(&app(), &Definition::new())
        .await
        .unwrap();

    assert!(!result.valid);
    assert_eq!(result.errors, vec!["services must not be empty"]);
}

#[tokio::test]
async fn optimization_status_parses_known_and_unknown_values() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/apps/web/images/optimize"))
        .and(body_json(json!({ "image": "registry.test/web:deployment-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "in_progress" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/apps/web/images/optimize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "archived" })))
        .mount(&server)
        .await;

    let client = client(&server);
    let first = client
        .optimization_status(&app(), "registry.test/web:deployment-1")
        .await
        .unwrap();
    let second = client
        .optimization_status(&app(), "registry.test/web:deployment-1")
        .await
        .unwrap();

    assert_eq!(first, OptimizationStatus::InProgress);
    assert_eq!(second, OptimizationStatus::Other("archived".to_string()));
}

#[tokio::test]
async fn create_release_omits_missing_definition() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/apps/web/releases"))
        .and(body_json(json!({ "app": "web", "image": "ghcr.io/org/web@sha256:abc" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "rel_9",
            "version": 9,
            "image": "ghcr.io/org/web@sha256:abc",
            "created_at": "2026-01-02T03:04:05Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let release = client(&server)
        .create_release(&ReleaseInput {
            app: app(),
            image: "ghcr.io/org/web@sha256:abc".to_string(),
            definition: None,
        })
        .await
        .unwrap();

    assert_eq!(release.id.as_str(), "rel_9");
    assert_eq!(release.version, 9);
    assert!(release.created_at.is_some());
}

#[tokio::test]
async fn unauthorized_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "token expired" })),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .optimization_status(&app(), "x")
        .await
        .unwrap_err();

    match err {
        PlatformError::Unauthorized(message) => assert_eq!(message, "token expired"),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_carry_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client(&server)
        .create_release(&ReleaseInput {
            app: app(),
            image: "x".to_string(),
            definition: None,
        })
        .await
        .unwrap_err();

    match err {
        PlatformError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_platform_is_transport_error() {
    let client = PlatformClient::new("http://127.0.0.1:1", "t").unwrap();
    let err = client.optimization_status(&app(), "x").await.unwrap_err();
    assert!(err.is_transport());
}
