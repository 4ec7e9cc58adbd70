//! Scene composer: prompt, visual style, aspect ratio, generate, upload.

use leptos::prelude::*;

use crate::app::FrameSender;
use crate::net::types::Frame;
use crate::state::composer::{ASPECT_RATIOS, ComposerState, VISUAL_STYLES};
use crate::state::storyboard::StoryboardState;

/// Left-hand configuration panel.
///
/// Sends `scene:generate` frames and feeds uploads straight into the
/// storyboard. The generate button doubles as the busy indicator.
#[component]
pub fn ComposerPanel() -> impl IntoView {
    let composer = expect_context::<RwSignal<ComposerState>>();
    let storyboard = expect_context::<RwSignal<StoryboardState>>();
    let sender = expect_context::<RwSignal<FrameSender>>();

    let do_generate = move || {
        let draft = composer.get();
        let prompt = draft.prompt.trim().to_owned();
        if prompt.is_empty() || storyboard.get().generating {
            return;
        }

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

    let on_upload = move |ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast;

            use crate::state::storyboard::StoryboardEntry;
            use crate::util::upload;

            // Uploads are ignored while a generation is in flight.
            if storyboard.get().generating {
                return;
            }
            let Some(input) = ev
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            // Reset the input so the same file can be uploaded again.
            input.set_value("");

            if !upload::is_supported_image(&file.type_()) {
                storyboard.update(|s| s.error = Some(upload::UPLOAD_READ_ERROR.to_owned()));
                return;
            }

            let name = file.name();
            upload::read_image_file(&file, move |result| match result {
                Ok(src) => storyboard.update(|s| {
                    s.push_entry(StoryboardEntry {
                        id: uuid::Uuid::new_v4().to_string(),
                        src,
                        prompt: upload::upload_prompt(&name),
                    });
                }),
                Err(message) => storyboard.update(|s| s.error = Some(message)),
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = ev;
        }
    };

    view! {
        <div class="composer-panel">
            <div>
                <h2 class="composer-panel__heading">"Scene Configuration"</h2>
                <p class="composer-panel__hint">"Describe the next scene of your storyboard."</p>
            </div>

            <div class="composer-panel__group">
                <span class="composer-panel__label">"Visual Style"</span>
                <div class="composer-panel__chips">
                    {VISUAL_STYLES
                        .into_iter()
                        .map(|style| {
                            view! {
                                <button
                                    class="composer-panel__chip"
                                    class:composer-panel__chip--active=move || {
                                        composer.get().visual_style == style
                                    }
                                    on:click=move |_| {
                                        composer.update(|c| c.visual_style = style.to_owned());
                                    }
                                >
                                    {style}
                                </button>
                            }
                        })
                        .collect::<Vec<_>>()}
                </div>
            </div>

            <div class="composer-panel__group">
                <span class="composer-panel__label">"Aspect Ratio"</span>
                <div class="composer-panel__chips">
                    {ASPECT_RATIOS
                        .into_iter()
                        .map(|ratio| {
                            view! {
                                <button
                                    class="composer-panel__chip"
                                    class:composer-panel__chip--active=move || {
                                        composer.get().aspect_ratio == ratio
                                    }
                                    on:click=move |_| {
                                        composer.update(|c| c.aspect_ratio = ratio.to_owned());
                                    }
                                >
                                    {ratio}
                                </button>
                            }
                        })
                        .collect::<Vec<_>>()}
                </div>
            </div>

            <div class="composer-panel__group">
                <span class="composer-panel__label">"Prompt"</span>
                <textarea
                    class="composer-panel__prompt"
                    placeholder="A detective in a rain-soaked office, looking out the window."
                    prop:value=move || composer.get().prompt
                    on:input=move |ev| composer.update(|c| c.prompt = event_target_value(&ev))
                    disabled=move || storyboard.get().generating
                ></textarea>
            </div>

            <div class="composer-panel__actions">
                <button
                    class="btn btn--primary composer-panel__generate"
                    disabled=move || {
                        storyboard.get().generating || composer.get().prompt.trim().is_empty()
                    }
                    on:click=move |_| do_generate()
                >
                    {move || {
                        let s = storyboard.get();
                        if s.generating {
                            "Generating..."
                        } else if s.entries.is_empty() {
                            "Generate Scene"
                        } else {
                            "Next Scene"
                        }
                    }}
                </button>
                <label class="composer-panel__upload" title="Upload Image">
                    "Upload"
                    <input
                        class="composer-panel__file"
                        type="file"
                        accept="image/png, image/jpeg"
                        on:change=on_upload
                        disabled=move || storyboard.get().generating
                    />
                </label>
            </div>
        </div>
    }
}
