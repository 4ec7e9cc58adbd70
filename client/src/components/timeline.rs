//! Storyboard timeline: thumbnail strip with select/delete/download per
//! entry and full-sequence export.

use leptos::prelude::*;

use crate::state::storyboard::StoryboardState;

/// Horizontal strip of entries in sequence order.
#[component]
pub fn Timeline() -> impl IntoView {
    let storyboard = expect_context::<RwSignal<StoryboardState>>();

    let export_all = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let images: Vec<String> = storyboard
                .get()
                .entries
                .iter()
                .map(|e| e.src.clone())
                .collect();
            crate::util::download::export_sequence(images);
        }
    };

    view! {
        <div class="timeline">
            <h3 class="timeline__heading">"Storyboard"</h3>
            {move || {
                let s = storyboard.get();
                if s.entries.is_empty() {
                    return view! {
                        <div class="timeline__empty">"Your storyboard is empty."</div>
                    }
                        .into_any();
                }

                let selected = s.selected_id.clone();
                view! {
                    <div class="timeline__strip">
                        {s
                            .entries
                            .iter()
                            .enumerate()
                            .map(|(index, entry)| {
                                let select_id = entry.id.clone();
                                let delete_id = entry.id.clone();
                                let download_src = entry.src.clone();
                                let src = entry.src.clone();
                                let alt = format!("Storyboard frame {}", index + 1);
                                let is_selected = selected.as_deref() == Some(entry.id.as_str());
                                view! {
                                    <div
                                        class="timeline__item"
                                        class:timeline__item--selected=is_selected
                                    >
                                        <img
                                            class="timeline__thumb"
                                            src=src
                                            alt=alt
                                            on:click=move |_| {
                                                storyboard.update(|st| st.select(&select_id));
                                            }
                                        />
                                        <div class="timeline__item-actions">
                                            <button
                                                class="timeline__action timeline__action--delete"
                                                title="Delete Image"
                                                on:click=move |_| {
                                                    storyboard.update(|st| st.delete_entry(&delete_id));
                                                }
                                            >
                                                "✕"
                                            </button>
                                            <button
                                                class="timeline__action"
                                                title="Download Image"
                                                on:click=move |_| {
                                                    #[cfg(feature = "hydrate")]
                                                    crate::util::download::download_data_url(
                                                        &download_src,
                                                        &crate::util::download::export_filename(index),
                                                    );
                                                    #[cfg(not(feature = "hydrate"))]
                                                    let _ = (&download_src, index);
                                                }
                                            >
                                                "↓"
                                            </button>
                                        </div>
                                    </div>
                                }
                            })
                            .collect::<Vec<_>>()}
                    </div>
                }
                    .into_any()
            }}
            {move || {
                (!storyboard.get().entries.is_empty())
                    .then(|| {
                        view! {
                            <div class="timeline__footer">
                                <button class="btn btn--primary" on:click=export_all>
                                    "Export Sequence"
                                </button>
                            </div>
                        }
                    })
            }}
        </div>
    }
}
