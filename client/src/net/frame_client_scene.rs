//! Scene frame handlers extracted from `frame_client`.

#[cfg(test)]
#[path = "frame_client_scene_test.rs"]
mod frame_client_scene_test;

#[cfg(any(test, feature = "hydrate"))]
use crate::net::types::Frame;
#[cfg(feature = "hydrate")]
use crate::net::types::FrameStatus;
#[cfg(feature = "hydrate")]
use crate::state::storyboard::StoryboardState;

/// Fallback message when a generation error frame has no message field.
#[cfg(any(test, feature = "hydrate"))]
pub(super) const GENERATE_FAILED_TEXT: &str = "Failed to generate image. Please try again.";

/// Fixed message for a suggestion failure after a successful generation.
#[cfg(any(test, feature = "hydrate"))]
pub(super) const SUGGEST_FAILED_TEXT: &str = "Failed to fetch suggestions, but image was generated.";

/// Build the follow-up `scene:suggest` request for a freshly generated scene.
#[cfg(any(test, feature = "hydrate"))]
pub(super) fn suggest_request(prompt: &str) -> Frame {
    Frame::request("scene:suggest", serde_json::json!({ "prompt": prompt }))
}

#[cfg(feature = "hydrate")]
pub(super) fn handle_scene_frame(
    frame: &Frame,
    storyboard: leptos::prelude::RwSignal<StoryboardState>,
    tx: &futures::channel::mpsc::UnboundedSender<Vec<u8>>,
) -> bool {
    use leptos::prelude::Update;

    match frame.syscall.as_str() {
        "scene:generate" if frame.status == FrameStatus::Done => {
            let Some(entry) = super::frame_client_parse::parse_generated_entry(frame) else {
                storyboard.update(|s| s.fail_generation(GENERATE_FAILED_TEXT));
                return true;
            };
            let prompt = entry.prompt.clone();
            storyboard.update(|s| {
                s.finish_generation(entry);
                s.begin_suggest();
            });
            // Ask for next-scene suggestions as soon as the image lands; a
            // suggestion failure never rolls the entry back.
            super::send_frame(tx, &suggest_request(&prompt));
            true
        }
        "scene:generate" if frame.status == FrameStatus::Error => {
            let message = super::frame_client_parse::frame_error_message(frame)
                .unwrap_or(GENERATE_FAILED_TEXT)
                .to_owned();
            storyboard.update(|s| s.fail_generation(message));
            true
        }
        "scene:suggest" if frame.status == FrameStatus::Done => {
            match super::frame_client_parse::parse_suggestions(frame) {
                Some(suggestions) => storyboard.update(|s| s.set_suggestions(suggestions)),
                None => storyboard.update(|s| s.fail_suggest(SUGGEST_FAILED_TEXT)),
            }
            true
        }
        "scene:suggest" if frame.status == FrameStatus::Error => {
            storyboard.update(|s| s.fail_suggest(SUGGEST_FAILED_TEXT));
            true
        }
        _ => false,
    }
}
