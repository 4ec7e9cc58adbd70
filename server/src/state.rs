//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! server holds no per-session storyboard data — the browser owns the entry
//! list — so the only shared state is the generative-AI client handle.

use std::sync::Arc;

use crate::genai::GenAi;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    /// Optional generative-AI client. `None` if provider env vars are not
    /// configured; scene and chat syscalls then answer with error frames.
    pub genai: Option<Arc<dyn GenAi>>,
}

impl AppState {
    #[must_use]
    pub fn new(genai: Option<Arc<dyn GenAi>>) -> Self {
        Self { genai }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
