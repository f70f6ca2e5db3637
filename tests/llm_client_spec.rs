//! OpenAI-compatible client tests against a local fake service.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use bookwright::config::Config;
use bookwright::llm::{GenerationError, Generator, OpenAiClient};
use bookwright::models::Prompt;
use serde_json::{json, Value};

type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

/// Serve `app` on an ephemeral port and return its base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

async fn completions(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.lock().unwrap().push((auth, body));
    Json(json!({
        "id": "chatcmpl-1",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": "  # Outline\n\n- Act I\n" } }
        ]
    }))
}

fn prompt() -> Prompt {
    Prompt::new("You draft outlines.", "Synopsis: A heist in orbit")
}

#[tokio::test]
async fn sends_system_and_user_messages_and_returns_text_verbatim() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(seen.clone());
    let base = spawn(app).await;
    let client = OpenAiClient::new(base, Some("sk-test".to_string()), "gpt-4o");

    let text = client.generate(&prompt()).await.expect("generate failed");

    assert_eq!(text, "  # Outline\n\n- Act I\n");
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], "You draft outlines.");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "Synopsis: A heist in orbit");
}

#[tokio::test]
async fn uses_the_configured_model() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(seen.clone());
    let base = spawn(app).await;
    let config = Config::from_lookup("/book", |key| match key {
        "OPENAI_BASE_URL" => Some(base.clone()),
        "OPENAI_API_KEY" => Some("sk-env".to_string()),
        "MODEL_NAME" => Some("gpt-4o-mini".to_string()),
        _ => None,
    });
    let client = OpenAiClient::from_config(&config.llm);

    client.generate(&prompt()).await.expect("generate failed");

    assert_eq!(client.model(), "gpt-4o-mini");
    assert_eq!(seen.lock().unwrap()[0].1["model"], "gpt-4o-mini");
}

#[tokio::test]
async fn fails_without_credentials_before_any_request() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(seen.clone());
    let base = spawn(app).await;
    let client = OpenAiClient::new(base, None, "gpt-4o");

    let err = client.generate(&prompt()).await.unwrap_err();

    assert!(matches!(err, GenerationError::MissingApiKey));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn maps_an_unknown_model_to_not_found() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::NOT_FOUND, "The model `gpt-9` does not exist") }),
    );
    let base = spawn(app).await;
    let client = OpenAiClient::new(base, Some("sk-test".to_string()), "gpt-9");

    let err = client.generate(&prompt()).await.unwrap_err();

    match err {
        GenerationError::NotFound(body) => assert!(body.contains("gpt-9")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn maps_rejected_credentials_to_unauthorized() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
    );
    let base = spawn(app).await;
    let client = OpenAiClient::new(base, Some("sk-wrong".to_string()), "gpt-4o");

    let err = client.generate(&prompt()).await.unwrap_err();

    assert!(matches!(err, GenerationError::Unauthorized));
}

#[tokio::test]
async fn reports_server_errors_with_status() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
    );
    let base = spawn(app).await;
    let client = OpenAiClient::new(base, Some("sk-test".to_string()), "gpt-4o");

    let err = client.generate(&prompt()).await.unwrap_err();

    match err {
        GenerationError::Server(msg) => {
            assert!(msg.contains("503"));
            assert!(msg.contains("overloaded"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn rejects_a_response_without_choices() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({ "choices": [] })) }),
    );
    let base = spawn(app).await;
    let client = OpenAiClient::new(base, Some("sk-test".to_string()), "gpt-4o");

    let err = client.generate(&prompt()).await.unwrap_err();

    assert!(matches!(err, GenerationError::EmptyResponse));
}

#[tokio::test]
async fn surfaces_connection_failures() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = OpenAiClient::new(
        format!("http://{}/v1", addr),
        Some("sk-test".to_string()),
        "gpt-4o",
    );

    let err = client.generate(&prompt()).await.unwrap_err();

    assert!(matches!(err, GenerationError::Http(_)));
}
