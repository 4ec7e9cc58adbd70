//! Storyboard page — the main workspace layout.

use leptos::prelude::*;

use crate::components::chat_widget::ChatWidget;
use crate::components::composer_panel::ComposerPanel;
use crate::components::header::Header;
use crate::components::scene_viewer::SceneViewer;
use crate::components::suggestion_panel::SuggestionPanel;
use crate::components::timeline::Timeline;
use crate::state::storyboard::StoryboardState;

/// Storyboard page — composes the header, error banner, composer panel,
/// viewer + timeline column, suggestion panel, and chat widget.
#[component]
pub fn StoryboardPage() -> impl IntoView {
    let storyboard = expect_context::<RwSignal<StoryboardState>>();

    view! {
        <div class="storyboard-page">
            <Header/>
            {move || {
                storyboard
                    .get()
                    .error
                    .map(|message| {
                        view! {
                            <div class="storyboard-page__error" role="alert">
                                <strong>"Error: "</strong>
                                <span>{message}</span>
                            </div>
                        }
                    })
            }}
            <main class="storyboard-page__main">
                <ComposerPanel/>
                <div class="storyboard-page__center">
                    <SceneViewer/>
                    <Timeline/>
                </div>
                <SuggestionPanel/>
            </main>
            <ChatWidget/>
        </div>
    }
}
