//! Chat service — explicit sessions and cancellable streaming replies.
//!
//! DESIGN
//! ======
//! A [`ChatSession`] is constructed by the caller from the wire history on
//! every turn — there is no lazily-created global chat handle. The reply
//! stream is consumed pull-wise with a cancellation signal polled against
//! every chunk await, so cancellation lands exactly between chunks.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::genai::{ChatTurn, GenAi, GenAiError};

// =============================================================================
// SESSION
// =============================================================================

/// One chat conversation, explicitly owned by the caller.
#[derive(Debug, Default, Clone)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Rebuild a session from prior turns (role + text pairs).
    #[must_use]
    pub fn from_history(turns: Vec<ChatTurn>) -> Self {
        Self { turns }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn::assistant(text));
    }

    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }
}

// =============================================================================
// STREAMING
// =============================================================================

/// Progress of one streaming reply, delivered through a channel so the
/// transport layer can map events to frames without touching the provider.
#[derive(Debug)]
pub enum ChatEvent {
    /// One text delta; deltas only ever append.
    Chunk(String),
    /// The reply completed; carries the accumulated text.
    Done { full_text: String },
    /// The caller cancelled between chunks; partial text stands.
    Cancelled,
    /// The stream failed; the client substitutes its fallback text.
    Failed(GenAiError),
}

/// Stream one assistant reply for `message` over the session history.
///
/// Events are emitted in order: zero or more `Chunk`s followed by exactly
/// one terminal `Done` / `Cancelled` / `Failed`. The `cancel` signal is
/// honored between chunks; dropping its sender counts as cancellation, so
/// an abandoned connection tears the stream down.
pub async fn stream_reply(
    genai: &Arc<dyn GenAi>,
    session: &ChatSession,
    message: &str,
    mut cancel: oneshot::Receiver<()>,
    events: mpsc::Sender<ChatEvent>,
) {
    let mut chunks = match genai.stream_chat(session.turns(), message).await {
        Ok(chunks) => chunks,
        Err(e) => {
            warn!(error = %e, "chat: failed to open stream");
            let _ = events.send(ChatEvent::Failed(e)).await;
            return;
        }
    };

    let mut full_text = String::new();
    loop {
        tokio::select! {
            _ = &mut cancel => {
                info!(chars = full_text.len(), "chat: stream cancelled");
                let _ = events.send(ChatEvent::Cancelled).await;
                return;
            }
            next = chunks.next_chunk() => match next {
                Some(Ok(chunk)) => {
                    full_text.push_str(&chunk);
                    if events.send(ChatEvent::Chunk(chunk)).await.is_err() {
                        // Receiver gone; nobody is listening anymore.
                        return;
                    }
                }
                Some(Err(e)) => {
                    warn!(error = %e, chars = full_text.len(), "chat: stream failed");
                    let _ = events.send(ChatEvent::Failed(e)).await;
                    return;
                }
                None => {
                    info!(chars = full_text.len(), "chat: stream complete");
                    let _ = events.send(ChatEvent::Done { full_text }).await;
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
