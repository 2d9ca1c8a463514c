// tests/companion_pipeline_test.rs
// End-to-end coverage of the message pipeline with deterministic backends:
// degrade-gracefully behavior, reconnect-surviving memory, session
// isolation, and the HTTP surface.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ws::Message;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tokio::sync::mpsc;
use tower::ServiceExt;

use solace::api;
use solace::api::ws::chat::{FALLBACK_REPLY, run_message_sequence};
use solace::error::{GenerationError, SynthesisError};
use solace::llm::{CompletionBackend, CompletionRequest};
use solace::session::ChannelBinding;
use solace::state::AppState;
use solace::tts::SpeechBackend;

// ============================================================================
// TEST DOUBLES
// ============================================================================

/// Replies with a fixed string and records every request it saw.
struct CapturingBackend {
    reply: String,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl CapturingBackend {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionBackend for CapturingBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.reply.clone())
    }

    fn name(&self) -> &'static str {
        "capturing"
    }
}

struct FailingBackend;

#[async_trait]
impl CompletionBackend for FailingBackend {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Api("502: backend down".into()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

struct StubSpeech;

#[async_trait]
impl SpeechBackend for StubSpeech {
    async fn render(&self, _text: &str) -> Result<Vec<u8>, SynthesisError> {
        Ok(vec![0x49, 0x44, 0x33])
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

struct FailingSpeech;

#[async_trait]
impl SpeechBackend for FailingSpeech {
    async fn render(&self, _text: &str) -> Result<Vec<u8>, SynthesisError> {
        Err(SynthesisError::Backend("voice model crashed".into()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

// ============================================================================
// TEST SETUP UTILITIES
// ============================================================================

fn make_state(
    completion: Arc<dyn CompletionBackend>,
    speech: Arc<dyn SpeechBackend>,
) -> (Arc<AppState>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(AppState::with_backends(
        completion,
        "test-model",
        speech,
        dir.path(),
    ));
    (state, dir)
}

fn make_channel() -> (ChannelBinding, mpsc::UnboundedReceiver<Message>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelBinding::new(tx), rx)
}

/// Pull the single outbound frame as parsed JSON.
fn recv_frame(rx: &mut mpsc::UnboundedReceiver<Message>) -> serde_json::Value {
    let msg = rx.try_recv().expect("expected an outbound frame");
    let Message::Text(text) = msg else {
        panic!("expected a text frame, got {:?}", msg);
    };
    serde_json::from_str(text.as_str()).unwrap()
}

async fn send_utterance(
    state: &Arc<AppState>,
    user_id: &str,
    utterance: &str,
) -> serde_json::Value {
    let (binding, mut rx) = make_channel();
    let generator = state.registry.connect(user_id, binding.clone()).await;

    let raw = serde_json::json!({ "type": "user_message", "text": utterance }).to_string();
    run_message_sequence(&raw, state, &generator, &binding).await.unwrap();

    state.registry.disconnect(user_id, binding.id()).await;
    recv_frame(&mut rx)
}

// ============================================================================
// PIPELINE
// ============================================================================

#[tokio::test]
async fn test_overwhelmed_message_end_to_end() {
    let backend = CapturingBackend::new("That sounds heavy. I'm right here with you.");
    let (state, _dir) = make_state(backend.clone(), Arc::new(StubSpeech));

    let frame = send_utterance(&state, "ada", "I feel so overwhelmed today").await;

    assert_eq!(frame["type"], "assistant_response");
    assert_eq!(frame["text"], "That sounds heavy. I'm right here with you.");

    let audio_url = frame["audio_url"].as_str().unwrap();
    assert!(audio_url.starts_with("/audio/"));

    let timestamp = frame["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());

    // The classifier's label reached the backend on the annotated utterance
    let requests = backend.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].input, "[Emotion: stressed] I feel so overwhelmed today");
}

#[tokio::test]
async fn test_generation_failure_sends_fallback_without_audio() {
    let (state, dir) = make_state(Arc::new(FailingBackend), Arc::new(StubSpeech));

    let frame = send_utterance(&state, "ada", "hello?").await;

    assert_eq!(frame["text"], FALLBACK_REPLY);
    assert!(frame["audio_url"].is_null());
    // Synthesis was skipped entirely: no artifact written
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_synthesis_failure_keeps_reply_text() {
    let backend = CapturingBackend::new("You did well to say it out loud.");
    let (state, _dir) = make_state(backend, Arc::new(FailingSpeech));

    let frame = send_utterance(&state, "ada", "rough week").await;

    assert_eq!(frame["text"], "You did well to say it out loud.");
    assert!(frame["audio_url"].is_null());
}

#[tokio::test]
async fn test_malformed_frames_produce_no_reply_and_keep_going() {
    let backend = CapturingBackend::new("still here");
    let (state, _dir) = make_state(backend.clone(), Arc::new(StubSpeech));

    let (binding, mut rx) = make_channel();
    let generator = state.registry.connect("ada", binding.clone()).await;

    for raw in [
        "not json at all",
        r#"{"type":"typing","active":true}"#,
        r#"{"type":"user_message"}"#,
    ] {
        run_message_sequence(raw, &state, &generator, &binding).await.unwrap();
        assert!(rx.try_recv().is_err(), "malformed frame must not produce a reply");
    }

    // The connection is still usable afterwards
    let raw = r#"{"type":"user_message","text":"are you there"}"#;
    run_message_sequence(raw, &state, &generator, &binding).await.unwrap();
    let frame = recv_frame(&mut rx);
    assert_eq!(frame["text"], "still here");
}

#[tokio::test]
async fn test_generation_failure_leaves_memory_untouched() {
    let (state, _dir) = make_state(Arc::new(FailingBackend), Arc::new(StubSpeech));

    let (binding, _rx) = make_channel();
    let generator = state.registry.connect("ada", binding.clone()).await;

    let raw = r#"{"type":"user_message","text":"anyone home"}"#;
    run_message_sequence(raw, &state, &generator, &binding).await.unwrap();

    assert!(generator.lock().await.history().is_empty());
}

// ============================================================================
// SESSIONS
// ============================================================================

#[tokio::test]
async fn test_memory_survives_reconnect() {
    let backend = CapturingBackend::new("I remember.");
    let (state, _dir) = make_state(backend.clone(), Arc::new(StubSpeech));

    send_utterance(&state, "ada", "my cat is called Turing").await;

    // New connection after disconnect: the second prompt carries the
    // pre-disconnect turns.
    send_utterance(&state, "ada", "what did I tell you?").await;

    let requests = backend.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    let prior: Vec<&str> = requests[1].turns.iter().map(|t| t.content.as_str()).collect();
    assert!(prior.contains(&"my cat is called Turing"));
    assert!(prior.contains(&"I remember."));
}

#[tokio::test]
async fn test_concurrent_sessions_stay_isolated() {
    let backend = CapturingBackend::new("mhm");
    let (state, _dir) = make_state(backend.clone(), Arc::new(StubSpeech));

    send_utterance(&state, "ada", "ada's private worry").await;
    send_utterance(&state, "ben", "ben's first message").await;

    let requests = backend.requests.lock().unwrap();
    // Ben's prompt starts from an empty window; nothing of Ada's leaked in
    assert!(requests[1].turns.is_empty());
    assert_eq!(state.registry.session_count().await, 2);
}

// ============================================================================
// HTTP SURFACE
// ============================================================================

#[tokio::test]
async fn test_status_endpoint() {
    let (state, _dir) = make_state(CapturingBackend::new("ok"), Arc::new(StubSpeech));
    let app = api::router(state);

    let response = app
        .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_audio_endpoint_serves_synthesized_artifact() {
    let (state, _dir) = make_state(CapturingBackend::new("ok"), Arc::new(StubSpeech));

    let file_name = state.synthesizer.synthesize("hello").await.unwrap();
    let app = api::router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/audio/{}", file_name))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "audio/mpeg"
    );
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.as_ref(), &[0x49, 0x44, 0x33]);
}

#[tokio::test]
async fn test_audio_endpoint_unknown_artifact_is_404() {
    let (state, _dir) = make_state(CapturingBackend::new("ok"), Arc::new(StubSpeech));
    let app = api::router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/audio/no-such-file.mp3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_audio_endpoint_rejects_path_traversal() {
    use axum::extract::{Path, State};

    let (state, _dir) = make_state(CapturingBackend::new("ok"), Arc::new(StubSpeech));

    let response =
        solace::api::http::audio_handler(State(state), Path("..%2fsecrets".to_string())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
