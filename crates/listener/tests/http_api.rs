//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use listener::create_app;
use nodes::PipelineExecutor;
use pipeline::{CompletionRequest, LlmError, LlmProvider};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Answers by inspecting the system prompt, so any number of runs can share it.
struct RoleAwareModel;

#[async_trait]
impl LlmProvider for RoleAwareModel {
    fn name(&self) -> &str {
        "role-aware"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let system = request.system.to_lowercase();
        let text = if system.contains("code reviewer") {
            "NO_CRITICAL_ISSUES"
        } else if system.contains("software designer") {
            "Architecture: one module\nComponents:\n- add()\n- main()"
        } else if system.contains("software architect") {
            "Overview: adds numbers\nKey Features:\n- addition\n- output"
        } else {
            "```python\ndef add(a, b):\n    return a + b\n```"
        };
        Ok(text.to_string())
    }
}

struct DownModel;

#[async_trait]
impl LlmProvider for DownModel {
    fn name(&self) -> &str {
        "down"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
        Err(LlmError::Transport {
            message: "connection refused".into(),
        })
    }
}

fn app_with(provider: Arc<dyn LlmProvider>) -> axum::Router {
    create_app(Arc::new(PipelineExecutor::new(provider)))
}

fn generate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app_with(Arc::new(RoleAwareModel))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn generate_returns_the_four_blobs() {
    let response = app_with(Arc::new(RoleAwareModel))
        .oneshot(generate_request(json!({
            "description": "sum two integers",
            "language": "python"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 4);
    for key in ["planning", "design", "code", "testing"] {
        let value = object[key].as_str().unwrap();
        assert!(!value.is_empty(), "{key} is empty");
    }
    assert!(body["code"].as_str().unwrap().starts_with("def add(a, b):"));
    assert!(body["testing"].as_str().unwrap().contains("Production Ready:"));
}

#[tokio::test]
async fn pipeline_failure_is_a_500_with_message() {
    let response = app_with(Arc::new(DownModel))
        .oneshot(generate_request(json!({
            "description": "sum two integers",
            "language": "python"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Planning"));
    assert!(message.contains("connection refused"));
}

#[tokio::test]
async fn blank_description_still_runs_the_pipeline() {
    let response = app_with(Arc::new(RoleAwareModel))
        .oneshot(generate_request(json!({ "description": "  ", "language": "go" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    for key in ["planning", "design", "code", "testing"] {
        assert!(!body[key].as_str().unwrap().is_empty(), "{key} is empty");
    }
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let response = app_with(Arc::new(RoleAwareModel))
        .oneshot(generate_request(json!({ "description": "x" })))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let response = app_with(Arc::new(RoleAwareModel))
        .oneshot(
            Request::get("/health")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
