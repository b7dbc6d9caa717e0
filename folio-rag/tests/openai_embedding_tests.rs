//! Error mapping of the OpenAI embedding provider against a local fake endpoint.

#![cfg(feature = "openai")]

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use folio_rag::{EmbeddingProvider, ErrorKind, OpenAIEmbeddingProvider, RagError};
use serde_json::{Value, json};

#[derive(Clone)]
struct Scripted {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

impl Scripted {
    fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self { status, body: body.into(), seen: Arc::new(Mutex::new(Vec::new())) }
    }
}

async fn embeddings(
    State(s): State<Scripted>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    s.seen.lock().unwrap().push((headers, body));
    let mut response = (s.status, s.body.clone()).into_response();
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

async fn spawn_server(script: Scripted) -> (String, tokio::task::JoinHandle<()>) {
    let app = Router::new().route("/v1/embeddings", post(embeddings)).with_state(script);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });
    (format!("http://{addr}/v1"), handle)
}

fn provider_for(base: &str) -> OpenAIEmbeddingProvider {
    OpenAIEmbeddingProvider::new("test-key")
        .expect("provider")
        .with_base_url(base)
        .with_model("test-embedder")
}

fn embeddings_body(count: usize) -> String {
    let data: Vec<Value> = (0..count)
        .map(|i| json!({ "object": "embedding", "index": i, "embedding": [i as f32, 0.5, -0.5] }))
        .collect();
    json!({ "object": "list", "data": data, "model": "test-embedder" }).to_string()
}

fn error_body(message: &str) -> String {
    json!({ "error": { "message": message, "type": "invalid_request_error" } }).to_string()
}

async fn embed_against(script: Scripted) -> Result<Vec<Vec<f32>>, RagError> {
    let (base, handle) = spawn_server(script).await;
    let result = provider_for(&base).embed_batch(&["alpha", "beta"]).await;
    handle.abort();
    result
}

#[tokio::test]
async fn batch_is_returned_in_order_and_request_is_well_formed() {
    let script = Scripted::new(StatusCode::OK, embeddings_body(2));
    let seen = script.seen.clone();

    let vectors = embed_against(script).await.unwrap();
    assert_eq!(vectors, vec![vec![0.0, 0.5, -0.5], vec![1.0, 0.5, -0.5]]);

    let seen = seen.lock().unwrap();
    let (headers, body) = &seen[0];
    assert_eq!(headers[AUTHORIZATION], "Bearer test-key");
    assert_eq!(body["model"], "test-embedder");
    assert_eq!(body["input"], json!(["alpha", "beta"]));
    assert!(body.get("dimensions").is_none());
}

#[tokio::test]
async fn auth_throttling_and_server_failures_are_model_load_errors() {
    for status in [
        StatusCode::UNAUTHORIZED,
        StatusCode::FORBIDDEN,
        StatusCode::TOO_MANY_REQUESTS,
        StatusCode::INTERNAL_SERVER_ERROR,
        StatusCode::SERVICE_UNAVAILABLE,
    ] {
        let err = embed_against(Scripted::new(status, error_body("try again later")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelLoad, "status {status}");
        match err {
            RagError::ModelLoad { model, message } => {
                assert_eq!(model, "test-embedder");
                assert!(message.contains("try again later"), "{message}");
            }
            other => panic!("expected ModelLoad for {status}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn rejected_input_is_an_encoding_error() {
    let script = Scripted::new(StatusCode::BAD_REQUEST, error_body("input is too long"));
    let err = embed_against(script).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert!(err.to_string().contains("input is too long"), "{err}");
}

#[tokio::test]
async fn unparseable_error_body_is_reported_verbatim() {
    let script = Scripted::new(StatusCode::UNPROCESSABLE_ENTITY, "upstream exploded");
    let err = embed_against(script).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert!(err.to_string().contains("upstream exploded"), "{err}");
}

#[tokio::test]
async fn malformed_success_body_is_an_encoding_error() {
    let err = embed_against(Scripted::new(StatusCode::OK, "{\"data\": 42}")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert!(err.to_string().contains("failed to parse response"), "{err}");
}

#[tokio::test]
async fn embedding_count_mismatch_is_an_encoding_error() {
    let err = embed_against(Scripted::new(StatusCode::OK, embeddings_body(1))).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert!(err.to_string().contains("expected 2 embeddings, got 1"), "{err}");
}

#[tokio::test]
async fn single_embed_with_empty_data_is_an_encoding_error() {
    let (base, handle) = spawn_server(Scripted::new(StatusCode::OK, embeddings_body(0))).await;
    let err = provider_for(&base).embed("alpha").await.unwrap_err();
    handle.abort();
    assert_eq!(err.kind(), ErrorKind::Encoding);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_model_load_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    drop(listener);

    let err = provider_for(&format!("http://{addr}/v1"))
        .embed_batch(&["alpha"])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModelLoad);
    assert!(err.to_string().contains("request failed"), "{err}");
}

#[tokio::test]
async fn empty_batch_makes_no_request() {
    let provider = provider_for("http://127.0.0.1:9/v1");
    assert!(provider.embed_batch(&[]).await.unwrap().is_empty());
}

#[test]
fn empty_key_is_rejected() {
    let err = OpenAIEmbeddingProvider::new("  ").err().expect("empty key must fail");
    assert_eq!(err.kind(), ErrorKind::ModelLoad);
}
