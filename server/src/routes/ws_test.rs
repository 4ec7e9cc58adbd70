use super::*;
use crate::genai::mock::{MockGenAi, ScriptedStream, canned_suggestions};
use crate::genai::{GenAi, GenAiError};
use crate::state::test_helpers::{test_app_state, test_app_state_with_genai};
use std::sync::Arc;
use std::time::Duration;

fn test_conn() -> (ConnState, mpsc::Receiver<Frame>) {
    let (client_tx, client_rx) = mpsc::channel(32);
    let conn = ConnState { client_id: "test-client".into(), client_tx, active_chat: None };
    (conn, client_rx)
}

fn generate_request(prompt: &str) -> Frame {
    Frame::request(
        "scene:generate",
        json!({ "prompt": prompt, "style": "Cinematic", "aspect_ratio": "16:9" }),
    )
}

async fn recv_frame(rx: &mut mpsc::Receiver<Frame>) -> Frame {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for frame")
        .expect("channel closed")
}

// =============================================================================
// DECODE FAILURES
// =============================================================================

#[tokio::test]
async fn garbage_bytes_produce_gateway_error() {
    let state = test_app_state();
    let (mut conn, _rx) = test_conn();

    let frames = process_inbound_bytes(&state, &mut conn, &[0xFF, 0xFF, 0xFF]).await;

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].syscall, "gateway:error");
}

// =============================================================================
// SCENE DISPATCH
// =============================================================================

#[tokio::test]
async fn scene_generate_without_genai_errors() {
    let state = test_app_state();
    let (mut conn, _rx) = test_conn();

    let frames = process_frame(&state, &mut conn, generate_request("a street")).await;

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].status, Status::Error);
    assert_eq!(
        frames[0].data.get("message").and_then(Value::as_str),
        Some("AI features not configured")
    );
}

#[tokio::test]
async fn scene_generate_replies_with_entry_payload() {
    let state = test_app_state_with_genai(Arc::new(MockGenAi::new()));
    let (mut conn, _rx) = test_conn();
    let req = generate_request("a lighthouse at dusk");
    let req_id = req.id.clone();

    let frames = process_frame(&state, &mut conn, req).await;

    assert_eq!(frames.len(), 1);
    let done = &frames[0];
    assert_eq!(done.status, Status::Done);
    assert_eq!(done.parent_id.as_deref(), Some(req_id.as_str()));
    assert_eq!(
        done.data.get("image").and_then(Value::as_str),
        Some("data:image/png;base64,QUJD")
    );
    // The payload prompt is the pre-suffix user prompt.
    assert_eq!(done.data.get("prompt").and_then(Value::as_str), Some("a lighthouse at dusk"));
    assert_eq!(done.data.get("aspect_ratio").and_then(Value::as_str), Some("16:9"));
}

#[tokio::test]
async fn scene_generate_rejects_empty_prompt() {
    let state = test_app_state_with_genai(Arc::new(MockGenAi::new()));
    let (mut conn, _rx) = test_conn();

    let frames = process_frame(&state, &mut conn, generate_request("  ")).await;

    assert_eq!(frames[0].status, Status::Error);
    assert_eq!(frames[0].data.get("code").and_then(Value::as_str), Some("E_EMPTY_PROMPT"));
}

#[tokio::test]
async fn scene_generate_rejects_unknown_aspect_ratio() {
    let state = test_app_state_with_genai(Arc::new(MockGenAi::new()));
    let (mut conn, _rx) = test_conn();
    let req = Frame::request(
        "scene:generate",
        json!({ "prompt": "a street", "aspect_ratio": "21:9" }),
    );

    let frames = process_frame(&state, &mut conn, req).await;

    assert_eq!(frames[0].status, Status::Error);
    assert_eq!(
        frames[0].data.get("code").and_then(Value::as_str),
        Some("E_INVALID_ASPECT_RATIO")
    );
}

#[tokio::test]
async fn scene_suggest_replies_with_canonical_batch() {
    let mut shuffled = canned_suggestions();
    shuffled.rotate_left(1);
    let state =
        test_app_state_with_genai(Arc::new(MockGenAi::new().with_suggestions(Ok(shuffled))));
    let (mut conn, _rx) = test_conn();
    let req = Frame::request("scene:suggest", json!({ "prompt": "a lighthouse" }));

    let frames = process_frame(&state, &mut conn, req).await;

    assert_eq!(frames[0].status, Status::Done);
    let suggestions = frames[0]
        .data
        .get("suggestions")
        .and_then(Value::as_array)
        .expect("suggestions array");
    assert_eq!(suggestions.len(), 3);
    assert_eq!(suggestions[0]["category"], "Camera Shot");
    assert_eq!(suggestions[1]["category"], "Action/Movement");
    assert_eq!(suggestions[2]["category"], "Detail Focus");
}

#[tokio::test]
async fn scene_suggest_failure_carries_structured_error() {
    let state = test_app_state_with_genai(Arc::new(
        MockGenAi::new().with_suggestions(Err(GenAiError::ApiRequest("timeout".into()))),
    ));
    let (mut conn, _rx) = test_conn();
    let req = Frame::request("scene:suggest", json!({ "prompt": "a lighthouse" }));

    let frames = process_frame(&state, &mut conn, req).await;

    assert_eq!(frames[0].status, Status::Error);
    assert_eq!(frames[0].data.get("code").and_then(Value::as_str), Some("E_API_REQUEST"));
    assert_eq!(
        frames[0].data.get("retryable").and_then(Value::as_bool),
        Some(true)
    );
}

#[tokio::test]
async fn unknown_prefix_errors() {
    let state = test_app_state();
    let (mut conn, _rx) = test_conn();
    let req = Frame::request("board:join", json!({}));

    let frames = process_frame(&state, &mut conn, req).await;

    assert_eq!(frames[0].status, Status::Error);
}

// =============================================================================
// CHAT DISPATCH
// =============================================================================

#[tokio::test]
async fn chat_send_streams_items_then_done() {
    let state = test_app_state_with_genai(Arc::new(MockGenAi::new().with_stream(Ok(
        ScriptedStream::of(vec![Ok("Hel".into()), Ok("lo".into())]),
    ))));
    let (mut conn, mut rx) = test_conn();
    let req = Frame::request("chat:send", json!({ "history": [], "message": "hi" }));
    let req_id = req.id.clone();

    let immediate = process_frame(&state, &mut conn, req).await;
    assert!(immediate.is_empty());

    let first = recv_frame(&mut rx).await;
    assert_eq!(first.status, Status::Item);
    assert_eq!(first.parent_id.as_deref(), Some(req_id.as_str()));
    assert_eq!(first.data.get("text").and_then(Value::as_str), Some("Hel"));

    let second = recv_frame(&mut rx).await;
    assert_eq!(second.data.get("text").and_then(Value::as_str), Some("lo"));

    let done = recv_frame(&mut rx).await;
    assert_eq!(done.status, Status::Done);
    assert_eq!(done.data.get("text").and_then(Value::as_str), Some("Hello"));
}

#[tokio::test]
async fn chat_send_forwards_history() {
    let mock = Arc::new(MockGenAi::new());
    let state = test_app_state_with_genai(mock.clone());
    let (mut conn, mut rx) = test_conn();
    let req = Frame::request(
        "chat:send",
        json!({
            "history": [
                { "role": "user", "text": "hi" },
                { "role": "assistant", "text": "hello!" },
                { "role": "system", "text": "ignored" },
            ],
            "message": "what next?",
        }),
    );

    let _ = process_frame(&state, &mut conn, req).await;
    // Drain until the terminal frame so the task has finished.
    loop {
        if recv_frame(&mut rx).await.status.is_terminal() {
            break;
        }
    }

    let calls = mock.seen_chat_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (history, message) = &calls[0];
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(message, "what next?");
}

#[tokio::test]
async fn chat_send_requires_message() {
    let state = test_app_state_with_genai(Arc::new(MockGenAi::new()));
    let (mut conn, _rx) = test_conn();
    let req = Frame::request("chat:send", json!({ "history": [], "message": "  " }));

    let frames = process_frame(&state, &mut conn, req).await;

    assert_eq!(frames[0].status, Status::Error);
    assert_eq!(frames[0].data.get("message").and_then(Value::as_str), Some("message required"));
}

#[tokio::test]
async fn chat_send_open_failure_yields_error_frame() {
    let state = test_app_state_with_genai(Arc::new(MockGenAi::new().with_stream(Err(
        GenAiError::ApiResponse { status: 503, body: "overloaded".into() },
    ))));
    let (mut conn, mut rx) = test_conn();
    let req = Frame::request("chat:send", json!({ "history": [], "message": "hi" }));

    let _ = process_frame(&state, &mut conn, req).await;

    let err = recv_frame(&mut rx).await;
    assert_eq!(err.status, Status::Error);
    assert_eq!(err.data.get("code").and_then(Value::as_str), Some("E_API_RESPONSE"));
}

#[tokio::test]
async fn second_chat_send_while_streaming_is_rejected() {
    let state = test_app_state_with_genai(Arc::new(
        MockGenAi::new().with_stream(Ok(ScriptedStream::hanging(vec![Ok("first".into())]))),
    ));
    let (mut conn, mut rx) = test_conn();

    let first = Frame::request("chat:send", json!({ "history": [], "message": "hi" }));
    let _ = process_frame(&state, &mut conn, first).await;
    // Wait for the first chunk so the stream is known to be in flight.
    let _ = recv_frame(&mut rx).await;

    let second = Frame::request("chat:send", json!({ "history": [], "message": "again" }));
    let frames = process_frame(&state, &mut conn, second).await;

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].status, Status::Error);
    assert_eq!(
        frames[0].data.get("message").and_then(Value::as_str),
        Some("chat stream already in progress")
    );
}

#[tokio::test]
async fn cancel_frame_stops_stream_between_chunks() {
    let state = test_app_state_with_genai(Arc::new(
        MockGenAi::new().with_stream(Ok(ScriptedStream::hanging(vec![Ok("partial".into())]))),
    ));
    let (mut conn, mut rx) = test_conn();

    let req = Frame::request("chat:send", json!({ "history": [], "message": "hi" }));
    let req_id = req.id.clone();
    let _ = process_frame(&state, &mut conn, req).await;
    let _ = recv_frame(&mut rx).await; // first chunk

    let cancel = Frame::cancel(req_id.clone());
    let frames = process_frame(&state, &mut conn, cancel).await;
    assert!(frames.is_empty());

    let terminal = recv_frame(&mut rx).await;
    assert_eq!(terminal.status, Status::Cancel);
    assert_eq!(terminal.parent_id.as_deref(), Some(req_id.as_str()));
}

#[tokio::test]
async fn cancel_with_unmatched_target_is_ignored() {
    let state = test_app_state_with_genai(Arc::new(
        MockGenAi::new().with_stream(Ok(ScriptedStream::hanging(vec![Ok("partial".into())]))),
    ));
    let (mut conn, mut rx) = test_conn();

    let req = Frame::request("chat:send", json!({ "history": [], "message": "hi" }));
    let _ = process_frame(&state, &mut conn, req).await;
    let _ = recv_frame(&mut rx).await;

    let cancel = Frame::cancel("not-the-request");
    let frames = process_frame(&state, &mut conn, cancel).await;
    assert!(frames.is_empty());
    assert!(conn.active_chat.as_ref().unwrap().cancel.is_some());
}

#[tokio::test]
async fn new_chat_allowed_after_previous_completes() {
    let state = test_app_state_with_genai(Arc::new(
        MockGenAi::new()
            .with_stream(Ok(ScriptedStream::of(vec![Ok("one".into())])))
            .with_stream(Ok(ScriptedStream::of(vec![Ok("two".into())]))),
    ));
    let (mut conn, mut rx) = test_conn();

    let first = Frame::request("chat:send", json!({ "history": [], "message": "hi" }));
    let _ = process_frame(&state, &mut conn, first).await;
    loop {
        if recv_frame(&mut rx).await.status.is_terminal() {
            break;
        }
    }
    // Await the finished task so `is_finished` cannot race.
    let previous = conn.active_chat.take().unwrap();
    previous.task.await.unwrap();

    let second = Frame::request("chat:send", json!({ "history": [], "message": "again" }));
    let frames = process_frame(&state, &mut conn, second).await;
    assert!(frames.is_empty(), "expected second chat to start: {frames:?}");

    let item = recv_frame(&mut rx).await;
    assert_eq!(item.data.get("text").and_then(Value::as_str), Some("two"));
}

// =============================================================================
// HISTORY PARSING
// =============================================================================

#[test]
fn parse_history_maps_roles_and_skips_unknown() {
    let data = json!({
        "history": [
            { "role": "user", "text": "a" },
            { "role": "model", "text": "b" },
            { "role": "assistant", "text": "c" },
            { "role": "narrator", "text": "d" },
            { "role": "user" },
        ]
    });

    let turns = parse_history(&data);
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(turns[2].role, Role::Assistant);
    assert_eq!(turns[2].text, "c");
}

#[test]
fn parse_history_without_field_is_empty() {
    assert!(parse_history(&json!({})).is_empty());
    assert!(parse_history(&json!({ "history": "nope" })).is_empty());
}
