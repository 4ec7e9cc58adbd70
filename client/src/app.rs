//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::net::types::Frame;
use crate::pages::storyboard::StoryboardPage;
use crate::state::chat::ChatState;
use crate::state::composer::ComposerState;
use crate::state::storyboard::StoryboardState;
use crate::state::ui::UiState;

// =============================================================================
// FRAME SENDER
// =============================================================================

/// Handle for sending frames to the server.
///
/// The SSR default is a no-op; the hydrate build installs the real channel
/// when the frame client spawns.
#[derive(Clone, Default)]
pub struct FrameSender {
    #[cfg(feature = "hydrate")]
    tx: Option<futures::channel::mpsc::UnboundedSender<Vec<u8>>>,
}

impl FrameSender {
    #[cfg(feature = "hydrate")]
    pub(crate) fn new(tx: futures::channel::mpsc::UnboundedSender<Vec<u8>>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Send a frame to the server. Returns `false` when no connection
    /// exists (always the case during SSR).
    pub fn send(&self, frame: &Frame) -> bool {
        #[cfg(feature = "hydrate")]
        if let Some(tx) = &self.tx {
            return crate::net::frame_client::send_frame(tx, frame);
        }
        let _ = frame;
        false
    }
}

// =============================================================================
// APP
// =============================================================================

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides all shared state contexts, spawns the WebSocket frame client in
/// the browser, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Provide reactive state contexts for all child components.
    let storyboard = RwSignal::new(StoryboardState::default());
    let composer = RwSignal::new(ComposerState::default());
    let chat = RwSignal::new(ChatState::default());
    let ui = RwSignal::new(UiState::default());

    provide_context(storyboard);
    provide_context(composer);
    provide_context(chat);
    provide_context(ui);

    #[cfg(feature = "hydrate")]
    let sender = {
        let tx = crate::net::frame_client::spawn_frame_client(storyboard, chat);
        RwSignal::new(FrameSender::new(tx))
    };
    #[cfg(not(feature = "hydrate"))]
    let sender = RwSignal::new(FrameSender::default());
    provide_context(sender);

    view! {
        <Stylesheet id="leptos" href="/pkg/sceneboard.css"/>
        <Title text="SceneBoard"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=StoryboardPage/>
            </Routes>
        </Router>
    }
}
