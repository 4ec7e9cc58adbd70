//! Pure frame-payload parse helpers shared by the frame handlers.

#[cfg(test)]
#[path = "frame_client_parse_test.rs"]
mod frame_client_parse_test;

#[cfg(any(test, feature = "hydrate"))]
use crate::net::types::{Frame, Suggestion};
#[cfg(any(test, feature = "hydrate"))]
use crate::state::storyboard::StoryboardEntry;

/// Extract the user-facing error message from an error frame.
#[cfg(any(test, feature = "hydrate"))]
pub(super) fn frame_error_message(frame: &Frame) -> Option<&str> {
    frame.data.get("message").and_then(serde_json::Value::as_str)
}

/// Build a storyboard entry from a `scene:generate` done payload. The
/// entry ID is minted locally; identifiers are unique within the session.
#[cfg(any(test, feature = "hydrate"))]
pub(super) fn parse_generated_entry(frame: &Frame) -> Option<StoryboardEntry> {
    let src = frame.data.get("image")?.as_str()?;
    let prompt = frame.data.get("prompt")?.as_str()?;
    Some(StoryboardEntry {
        id: uuid::Uuid::new_v4().to_string(),
        src: src.to_string(),
        prompt: prompt.to_string(),
    })
}

/// Parse the suggestion batch from a `scene:suggest` done payload.
#[cfg(any(test, feature = "hydrate"))]
pub(super) fn parse_suggestions(frame: &Frame) -> Option<Vec<Suggestion>> {
    let value = frame.data.get("suggestions")?.clone();
    serde_json::from_value(value).ok()
}

/// Extract the text delta from a `chat:send` item payload.
#[cfg(any(test, feature = "hydrate"))]
pub(super) fn chunk_text(frame: &Frame) -> Option<&str> {
    frame.data.get("text").and_then(serde_json::Value::as_str)
}
