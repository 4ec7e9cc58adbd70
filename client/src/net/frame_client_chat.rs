//! Chat frame handlers extracted from `frame_client`.

#[cfg(feature = "hydrate")]
use crate::net::types::{Frame, FrameStatus};
#[cfg(feature = "hydrate")]
use crate::state::chat::ChatState;

#[cfg(feature = "hydrate")]
pub(super) fn handle_chat_frame(
    frame: &Frame,
    chat: leptos::prelude::RwSignal<ChatState>,
) -> bool {
    use leptos::prelude::Update;

    if frame.syscall != "chat:send" {
        return false;
    }

    match frame.status {
        FrameStatus::Item => {
            if let Some(text) = super::frame_client_parse::chunk_text(frame) {
                let text = text.to_owned();
                chat.update(|c| c.append_chunk(&text));
            }
            true
        }
        FrameStatus::Done => {
            chat.update(ChatState::finish_stream);
            true
        }
        // A cancelled stream keeps whatever text already arrived.
        FrameStatus::Cancel => {
            chat.update(ChatState::finish_stream);
            true
        }
        FrameStatus::Error => {
            chat.update(ChatState::fail_stream);
            true
        }
        _ => true,
    }
}
