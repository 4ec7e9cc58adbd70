//! Suggestion panel: categorized next-scene prompts from the assistant.

use leptos::prelude::*;

use crate::app::FrameSender;
use crate::net::types::Frame;
use crate::state::composer::ComposerState;
use crate::state::storyboard::StoryboardState;

/// Right-hand panel with one card per suggestion category.
///
/// The first suggestion of a fresh batch is preselected; generating from a
/// card re-uses the composer's style and aspect ratio.
#[component]
pub fn SuggestionPanel() -> impl IntoView {
    let storyboard = expect_context::<RwSignal<StoryboardState>>();
    let composer = expect_context::<RwSignal<ComposerState>>();
    let sender = expect_context::<RwSignal<FrameSender>>();

    let selected_prompt = RwSignal::new(String::new());

    // Preselect the first suggestion whenever a new batch lands; clear the
    // selection when the batch is discarded.
    Effect::new(move || {
        let first = storyboard
            .get()
            .suggestions
            .as_ref()
            .and_then(|list| list.first())
            .map(|s| s.prompt.clone())
            .unwrap_or_default();
        selected_prompt.set(first);
    });

    let generate_selected = move |_| {
        let prompt = selected_prompt.get();
        if prompt.is_empty() || storyboard.get().generating {
            return;
        }
        let draft = composer.get();

        let frame = Frame::request(
            "scene:generate",
            serde_json::json!({
                "prompt": prompt,
                "style": draft.visual_style,
                "aspect_ratio": draft.aspect_ratio,
            }),
        );
        storyboard.update(StoryboardState::begin_generation);
        sender.get().send(&frame);
    };

    view! {
        <div class="suggestion-panel">
            <div>
                <h2 class="suggestion-panel__heading">
                    {move || format!("AI Suggestions for Scene {}", storyboard.get().entries.len() + 1)}
                </h2>
                <p class="suggestion-panel__hint">"Choose the next shot for your sequence."</p>
            </div>

            <div class="suggestion-panel__cards">
                {move || {
                    let s = storyboard.get();
                    if s.suggesting {
                        return view! {
                            <div class="suggestion-panel__busy">
                                <div class="spinner"></div>
                                <p>"Thinking of next scenes..."</p>
                            </div>
                        }
                            .into_any();
                    }
                    if let Some(suggestions) = s.suggestions {
                        suggestions
                            .into_iter()
                            .map(|suggestion| {
                                let active = suggestion.prompt.clone();
                                let select = suggestion.prompt.clone();
                                view! {
                                    <button
                                        class="suggestion-panel__card"
                                        class:suggestion-panel__card--selected=move || {
                                            selected_prompt.get() == active
                                        }
                                        on:click=move |_| selected_prompt.set(select.clone())
                                    >
                                        <h4 class="suggestion-panel__category">
                                            {suggestion.category.clone()}
                                        </h4>
                                        <p class="suggestion-panel__prompt">{suggestion.prompt.clone()}</p>
                                    </button>
                                }
                            })
                            .collect::<Vec<_>>()
                            .into_any()
                    } else {
                        view! {
                            <div class="suggestion-panel__empty">
                                "Suggestions will appear here after the first image is generated."
                            </div>
                        }
                            .into_any()
                    }
                }}
            </div>

            <button
                class="btn btn--primary suggestion-panel__generate"
                disabled=move || {
                    selected_prompt.get().is_empty() || storyboard.get().suggesting
                        || storyboard.get().generating
                }
                on:click=generate_selected
            >
                {move || format!("Generate Scene {}", storyboard.get().entries.len() + 1)}
            </button>
        </div>
    }
}
