//! Chat assistant state: the transcript and the streaming flag.
//!
//! DESIGN
//! ======
//! A send opens a user turn plus an empty assistant turn; item frames
//! append to the assistant turn so its text only ever grows during a
//! successful stream. A failure replaces the in-progress text with the
//! fixed fallback apology — never both.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

/// Fallback assistant text shown when a stream fails.
pub const CHAT_FALLBACK_TEXT: &str = "Sorry, I couldn't get a response.";

/// Attribution of one chat turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    /// Wire label for the chat history payload.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in the chat exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

/// State for the floating chat widget.
#[derive(Clone, Debug, Default)]
pub struct ChatState {
    /// Transcript in exchange order.
    pub turns: Vec<ChatTurn>,
    /// True while an assistant reply is streaming in; blocks duplicate sends.
    pub streaming: bool,
}

impl ChatState {
    /// Open a new exchange: the user turn plus an empty assistant turn that
    /// the stream will append into.
    pub fn begin_turn(&mut self, user_text: impl Into<String>) {
        self.turns.push(ChatTurn { role: TurnRole::User, text: user_text.into() });
        self.turns.push(ChatTurn { role: TurnRole::Assistant, text: String::new() });
        self.streaming = true;
    }

    /// Append one streamed chunk to the open assistant turn.
    pub fn append_chunk(&mut self, chunk: &str) {
        if !self.streaming {
            return;
        }
        if let Some(turn) = self.turns.last_mut()
            && turn.role == TurnRole::Assistant
        {
            turn.text.push_str(chunk);
        }
    }

    /// The stream finished; whatever text accumulated stands.
    pub fn finish_stream(&mut self) {
        self.streaming = false;
    }

    /// The stream failed: replace the in-progress assistant text with the
    /// fixed fallback. A no-op when nothing is streaming.
    pub fn fail_stream(&mut self) {
        if !self.streaming {
            return;
        }
        if let Some(turn) = self.turns.last_mut()
            && turn.role == TurnRole::Assistant
        {
            turn.text = CHAT_FALLBACK_TEXT.to_string();
        }
        self.streaming = false;
    }
}
