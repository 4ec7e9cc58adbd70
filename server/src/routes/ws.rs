//! WebSocket handler — frame dispatch for the AI gateway.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID and enters a `select!` loop:
//! - Incoming binary frames → decode + dispatch by syscall prefix
//! - Frames from the in-flight chat task → forward to the client
//!
//! Scene syscalls are plain request/done exchanges. Chat is the streaming
//! exception: `chat:send` spawns a task that emits one item frame per chunk
//! through the connection channel, ending with a done/error/cancel frame.
//! A cancel frame targeting the in-flight request stops the stream between
//! chunks.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → send `session:connected` with `client_id`
//! 2. Client sends request frames → dispatch → reply / spawn stream
//! 3. Close → drop the connection state, which cancels any open stream

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use serde_json::{Value, json};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};
use uuid::Uuid;

use frames::{Frame, Status};

use crate::genai::{ChatTurn, Role};
use crate::services;
use crate::services::chat::{ChatEvent, ChatSession};
use crate::state::AppState;

// =============================================================================
// CONNECTION STATE
// =============================================================================

/// Per-connection state. Owned by the socket task; handed to the dispatch
/// functions so they stay testable without a live socket.
struct ConnState {
    client_id: String,
    /// Sender for frames produced outside the request/reply path (chat
    /// stream items). The socket task drains the paired receiver.
    client_tx: mpsc::Sender<Frame>,
    /// The in-flight chat stream, if any. One at a time per connection.
    active_chat: Option<ActiveChat>,
}

/// Handle on a spawned chat stream. Dropping it drops the cancel sender,
/// which the stream task treats as cancellation; an abandoned connection
/// tears its stream down.
struct ActiveChat {
    request_id: String,
    cancel: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4().to_string();

    // Per-connection channel for frames emitted by streaming tasks.
    let (client_tx, mut client_rx) = mpsc::channel::<Frame>(256);
    let mut conn = ConnState { client_id: client_id.clone(), client_tx, active_chat: None };

    let welcome =
        Frame::request("session:connected", json!({})).with_data("client_id", client_id.clone());
    if send_frame(&mut socket, &welcome).await.is_err() {
        return;
    }

    info!(%client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Binary(bytes) => {
                        for frame in process_inbound_bytes(&state, &mut conn, &bytes).await {
                            let _ = send_frame(&mut socket, &frame).await;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(frame) = client_rx.recv() => {
                if send_frame(&mut socket, &frame).await.is_err() {
                    break;
                }
            }
        }
    }

    // Dropping the connection state drops the cancel sender of any open
    // chat stream, ending it at the next chunk boundary.
    drop(conn);
    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Decode and process one inbound binary message, returning the frames to
/// send back to this client immediately. Streaming replies bypass the
/// return value and flow through the connection channel instead.
async fn process_inbound_bytes(state: &AppState, conn: &mut ConnState, bytes: &[u8]) -> Vec<Frame> {
    let frame = match frames::decode_frame(bytes) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(client_id = %conn.client_id, error = %e, "ws: invalid inbound frame");
            let err = Frame::request("gateway:error", json!({}))
                .with_data("message", format!("invalid frame: {e}"));
            return vec![err];
        }
    };

    process_frame(state, conn, frame).await
}

/// Dispatch one decoded frame.
async fn process_frame(state: &AppState, conn: &mut ConnState, mut frame: Frame) -> Vec<Frame> {
    // Stamp the connection identity as `from`.
    frame.from = Some(conn.client_id.clone());

    if frame.status == Status::Cancel {
        handle_cancel(conn, &frame);
        return vec![];
    }

    if frame.status != Status::Request {
        warn!(client_id = %conn.client_id, status = ?frame.status, "ws: ignoring non-request frame");
        return vec![];
    }

    info!(client_id = %conn.client_id, id = %frame.id, syscall = %frame.syscall, "ws: recv frame");

    match frame.prefix() {
        "scene" => handle_scene(state, &frame).await,
        "chat" => handle_chat(state, conn, &frame),
        prefix => vec![frame.error(format!("unknown prefix: {prefix}"))],
    }
}

// =============================================================================
// SCENE HANDLERS
// =============================================================================

async fn handle_scene(state: &AppState, req: &Frame) -> Vec<Frame> {
    let Some(genai) = &state.genai else {
        return vec![req.error("AI features not configured")];
    };

    match req.op() {
        "generate" => {
            let prompt = req.data.get("prompt").and_then(Value::as_str).unwrap_or("");
            let style = req
                .data
                .get("style")
                .and_then(Value::as_str)
                .unwrap_or("Cinematic");
            let aspect_ratio = req
                .data
                .get("aspect_ratio")
                .and_then(Value::as_str)
                .unwrap_or("16:9");

            match services::scene::generate_scene(genai, prompt, style, aspect_ratio).await {
                Ok(payload) => vec![req.done_with(json!({
                    "image": payload.image,
                    "prompt": payload.prompt,
                    "aspect_ratio": payload.aspect_ratio,
                }))],
                Err(e) => vec![req.error_from(&e)],
            }
        }
        "suggest" => {
            let prompt = req.data.get("prompt").and_then(Value::as_str).unwrap_or("");

            match services::scene::fetch_suggestions(genai, prompt).await {
                Ok(suggestions) => vec![req.done_with(json!({ "suggestions": suggestions }))],
                Err(e) => vec![req.error_from(&e)],
            }
        }
        op => vec![req.error(format!("unknown scene op: {op}"))],
    }
}

// =============================================================================
// CHAT HANDLERS (exception: replies stream through the connection channel)
// =============================================================================

fn handle_chat(state: &AppState, conn: &mut ConnState, req: &Frame) -> Vec<Frame> {
    let Some(genai) = &state.genai else {
        return vec![req.error("AI features not configured")];
    };

    match req.op() {
        "send" => {
            let message = req
                .data
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("")
                .trim()
                .to_string();
            if message.is_empty() {
                return vec![req.error("message required")];
            }

            if let Some(active) = &conn.active_chat
                && !active.task.is_finished()
            {
                return vec![req.error("chat stream already in progress")];
            }

            let session = ChatSession::from_history(parse_history(&req.data));
            let (cancel_tx, cancel_rx) = oneshot::channel();
            let task = spawn_chat_stream(
                genai.clone(),
                session,
                message,
                req.clone(),
                cancel_rx,
                conn.client_tx.clone(),
            );

            conn.active_chat =
                Some(ActiveChat { request_id: req.id.clone(), cancel: Some(cancel_tx), task });
            vec![]
        }
        op => vec![req.error(format!("unknown chat op: {op}"))],
    }
}

fn handle_cancel(conn: &mut ConnState, frame: &Frame) {
    let Some(target) = frame.parent_id.as_deref() else {
        warn!(client_id = %conn.client_id, "ws: cancel without target");
        return;
    };

    let Some(active) = conn.active_chat.as_mut() else {
        warn!(client_id = %conn.client_id, target, "ws: cancel with no stream in flight");
        return;
    };

    if active.request_id != target {
        warn!(client_id = %conn.client_id, target, "ws: cancel target does not match in-flight stream");
        return;
    }

    if let Some(cancel) = active.cancel.take() {
        info!(client_id = %conn.client_id, target, "ws: cancelling chat stream");
        let _ = cancel.send(());
    }
}

/// Spawn the chat stream task: one half produces [`ChatEvent`]s, the other
/// maps them onto reply frames for this connection.
fn spawn_chat_stream(
    genai: std::sync::Arc<dyn crate::genai::GenAi>,
    session: ChatSession,
    message: String,
    req: Frame,
    cancel_rx: oneshot::Receiver<()>,
    client_tx: mpsc::Sender<Frame>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let (events_tx, mut events_rx) = mpsc::channel::<ChatEvent>(32);

        let producer = services::chat::stream_reply(&genai, &session, &message, cancel_rx, events_tx);
        let consumer = async {
            while let Some(event) = events_rx.recv().await {
                let frame = match event {
                    ChatEvent::Chunk(text) => req.item(json!({ "text": text })),
                    ChatEvent::Done { full_text } => req.done_with(json!({ "text": full_text })),
                    ChatEvent::Cancelled => req.cancelled(),
                    ChatEvent::Failed(e) => req.error_from(&e),
                };
                if client_tx.send(frame).await.is_err() {
                    // Connection gone; stop consuming.
                    break;
                }
            }
        };

        let ((), ()) = tokio::join!(producer, consumer);
    })
}

/// Parse the wire history (role + text pairs) into typed turns. Unknown
/// roles are skipped rather than failing the whole request.
fn parse_history(data: &Value) -> Vec<ChatTurn> {
    let Some(items) = data.get("history").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let role = item.get("role").and_then(Value::as_str)?;
            let text = item.get("text").and_then(Value::as_str)?;
            let role = match role {
                "user" => Role::User,
                "assistant" | "model" => Role::Assistant,
                _ => return None,
            };
            Some(ChatTurn { role, text: text.to_string() })
        })
        .collect()
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), ()> {
    if frame.status == Status::Error {
        let code = frame.data.get("code").and_then(Value::as_str).unwrap_or("-");
        let message = frame
            .data
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("-");
        warn!(id = %frame.id, syscall = %frame.syscall, code, message, "ws: send frame status=Error");
    } else {
        info!(id = %frame.id, syscall = %frame.syscall, status = ?frame.status, "ws: send frame");
    }

    let bytes = frames::encode_frame(frame);
    socket
        .send(Message::Binary(bytes.into()))
        .await
        .map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
