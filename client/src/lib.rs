//! # client
//!
//! Leptos + WASM frontend for the SceneBoard storyboard authoring app.
//!
//! This crate contains pages, components, application state, network types,
//! and the WebSocket frame client. The browser owns all storyboard state —
//! the ordered entry list, selection, suggestions, and the chat transcript —
//! and talks to the server's AI gateway over binary frames.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
