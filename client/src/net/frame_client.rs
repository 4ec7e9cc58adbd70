//! WebSocket frame client for real-time communication with the server.
//!
//! The frame client manages the WebSocket lifecycle: connection,
//! reconnection with exponential backoff, frame dispatch, and signal
//! updates. It is the bridge between the server's frame protocol and the
//! Leptos UI state.
//!
//! All WebSocket logic is gated behind `#[cfg(feature = "hydrate")]` since
//! it requires a browser environment.
//!
//! ERROR HANDLING
//! ==============
//! Parse/transport failures are handled defensively and translated into
//! state updates and logging; a lost connection clears the busy flags so
//! the UI never waits on replies that cannot arrive.

#[path = "frame_client_chat.rs"]
mod frame_client_chat;
#[path = "frame_client_parse.rs"]
mod frame_client_parse;
#[path = "frame_client_scene.rs"]
mod frame_client_scene;

#[cfg(feature = "hydrate")]
use self::frame_client_chat::handle_chat_frame;
#[cfg(feature = "hydrate")]
use self::frame_client_scene::handle_scene_frame;

#[cfg(feature = "hydrate")]
use crate::net::types::Frame;
#[cfg(feature = "hydrate")]
use crate::state::chat::ChatState;
#[cfg(feature = "hydrate")]
use crate::state::storyboard::StoryboardState;

/// Send a frame to the server via the shared sender channel.
///
/// Returns `false` if the channel is closed (no active connection).
#[cfg(feature = "hydrate")]
pub fn send_frame(tx: &futures::channel::mpsc::UnboundedSender<Vec<u8>>, frame: &Frame) -> bool {
    tx.unbounded_send(frames::encode_frame(frame)).is_ok()
}

/// Spawn the WebSocket frame client lifecycle as a local async task.
///
/// This connects to the server, handles incoming frames, and reconnects
/// on disconnect with exponential backoff.
#[cfg(feature = "hydrate")]
pub fn spawn_frame_client(
    storyboard: leptos::prelude::RwSignal<StoryboardState>,
    chat: leptos::prelude::RwSignal<ChatState>,
) -> futures::channel::mpsc::UnboundedSender<Vec<u8>> {
    use futures::channel::mpsc;

    let (tx, rx) = mpsc::unbounded::<Vec<u8>>();
    let tx_clone = tx.clone();

    leptos::task::spawn_local(frame_client_loop(storyboard, chat, tx_clone, rx));

    tx
}

/// Main connection loop with reconnect logic.
#[cfg(feature = "hydrate")]
async fn frame_client_loop(
    storyboard: leptos::prelude::RwSignal<StoryboardState>,
    chat: leptos::prelude::RwSignal<ChatState>,
    tx: futures::channel::mpsc::UnboundedSender<Vec<u8>>,
    rx: futures::channel::mpsc::UnboundedReceiver<Vec<u8>>,
) {
    use leptos::prelude::Update;
    use std::cell::RefCell;
    use std::rc::Rc;

    let rx = Rc::new(RefCell::new(rx));
    let mut backoff_ms: u32 = 1000;
    let max_backoff_ms: u32 = 10_000;

    loop {
        // Determine WebSocket URL from the page location.
        let location = web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default();
        let ws_proto = if location.starts_with("https") { "wss" } else { "ws" };
        let host = web_sys::window()
            .and_then(|w| w.location().host().ok())
            .unwrap_or_else(|| "localhost:3000".to_owned());
        let ws_url = format!("{ws_proto}://{host}/api/ws");

        match connect_and_run(&ws_url, storyboard, chat, &tx, &rx).await {
            Ok(()) => {
                leptos::logging::log!("WS disconnected cleanly");
                backoff_ms = 1000;
            }
            Err(e) => {
                leptos::logging::warn!("WS error: {e}");
            }
        }

        // Replies for in-flight requests died with the connection.
        storyboard.update(StoryboardState::abort_in_flight);
        chat.update(ChatState::fail_stream);

        // Exponential backoff before reconnect.
        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(backoff_ms))).await;
        backoff_ms = (backoff_ms * 2).min(max_backoff_ms);
    }
}

/// Connect to the WebSocket and process messages until disconnect.
#[cfg(feature = "hydrate")]
async fn connect_and_run(
    url: &str,
    storyboard: leptos::prelude::RwSignal<StoryboardState>,
    chat: leptos::prelude::RwSignal<ChatState>,
    tx: &futures::channel::mpsc::UnboundedSender<Vec<u8>>,
    rx: &std::rc::Rc<std::cell::RefCell<futures::channel::mpsc::UnboundedReceiver<Vec<u8>>>>,
) -> Result<(), String> {
    use futures::StreamExt;
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;

    let ws = WebSocket::open(url).map_err(|e| e.to_string())?;
    let (mut ws_write, mut ws_read) = ws.split();

    // Forward outgoing frames from our channel to the WS.
    let mut rx_borrow = rx.borrow_mut();
    let send_task = async {
        use futures::SinkExt;
        while let Some(msg) = rx_borrow.next().await {
            if ws_write.send(Message::Bytes(msg)).await.is_err() {
                break;
            }
        }
    };

    // Receive loop: process incoming frames.
    let recv_task = async {
        while let Some(msg) = ws_read.next().await {
            match msg {
                Ok(Message::Bytes(bytes)) => {
                    if let Ok(frame) = frames::decode_frame(&bytes) {
                        dispatch_frame(&frame, storyboard, chat, tx);
                    }
                }
                Ok(Message::Text(_)) => {}
                Err(e) => {
                    leptos::logging::warn!("WS recv error: {e}");
                    break;
                }
            }
        }
    };

    // Run send/recv loops; when either finishes, the connection is done.
    futures::future::select(Box::pin(send_task), Box::pin(recv_task)).await;

    Ok(())
}

/// Dispatch an incoming frame to the appropriate state handler.
#[cfg(feature = "hydrate")]
fn dispatch_frame(
    frame: &Frame,
    storyboard: leptos::prelude::RwSignal<StoryboardState>,
    chat: leptos::prelude::RwSignal<ChatState>,
    tx: &futures::channel::mpsc::UnboundedSender<Vec<u8>>,
) {
    if frame.syscall == "session:connected" {
        leptos::logging::log!(
            "session connected as {}",
            frame
                .data
                .get("client_id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("?")
        );
        return;
    }
    if handle_scene_frame(frame, storyboard, tx) {
        return;
    }
    if handle_chat_frame(frame, chat) {
        return;
    }
    if frame.syscall == "gateway:error" {
        leptos::logging::warn!("gateway:error frame: {}", frame.data);
    }
}
