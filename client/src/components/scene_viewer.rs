//! Current-scene viewer: the selected image, busy placeholder, and
//! regenerate control.

use leptos::prelude::*;

use crate::app::FrameSender;
use crate::net::types::Frame;
use crate::state::composer::ComposerState;
use crate::state::storyboard::StoryboardState;

/// Large preview of the current entry.
///
/// Regenerate re-submits the current entry's prompt with the composer's
/// style and aspect ratio; the result appends as a new entry.
#[component]
pub fn SceneViewer() -> impl IntoView {
    let storyboard = expect_context::<RwSignal<StoryboardState>>();
    let composer = expect_context::<RwSignal<ComposerState>>();
    let sender = expect_context::<RwSignal<FrameSender>>();

    let regenerate = move |_| {
        let s = storyboard.get();
        if s.generating {
            return;
        }
        let Some(entry) = s.current_entry().cloned() else {
            return;
        };
        let draft = composer.get();

        let frame = Frame::request(
            "scene:generate",
            serde_json::json!({
                "prompt": entry.prompt,
                "style": draft.visual_style,
                "aspect_ratio": draft.aspect_ratio,
            }),
        );
        storyboard.update(StoryboardState::begin_generation);
        sender.get().send(&frame);
    };

    view! {
        <div class="scene-viewer">
            <div class="scene-viewer__stage">
                {move || {
                    let s = storyboard.get();
                    if s.generating {
                        return view! {
                            <div class="scene-viewer__busy">
                                <div class="spinner"></div>
                                <p>"Generating your vision..."</p>
                            </div>
                        }
                            .into_any();
                    }
                    if let Some(entry) = s.current_entry() {
                        let seq = s.sequence_number(&entry.id).unwrap_or(0);
                        let src = entry.src.clone();
                        let alt = entry.prompt.clone();
                        view! {
                            <div class="scene-viewer__frame">
                                <img class="scene-viewer__image" src=src alt=alt/>
                                <span class="scene-viewer__badge">{format!("Scene {seq}")}</span>
                            </div>
                        }
                            .into_any()
                    } else {
                        view! {
                            <div class="scene-viewer__empty">
                                <p>"Your generated scene will appear here."</p>
                                <p class="scene-viewer__empty-hint">
                                    "Start by writing a prompt on the left."
                                </p>
                            </div>
                        }
                            .into_any()
                    }
                }}
            </div>
            {move || {
                let s = storyboard.get();
                (!s.generating && s.current_entry().is_some())
                    .then(|| {
                        view! {
                            <button class="btn scene-viewer__regenerate" on:click=regenerate>
                                "Regenerate"
                            </button>
                        }
                    })
            }}
        </div>
    }
}
