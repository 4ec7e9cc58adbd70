//! Local UI chrome state.
//!
//! Keeps transient presentation concerns out of domain state so rendering
//! controls can evolve independently of protocol data.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

/// UI state for the floating chat widget.
#[derive(Clone, Copy, Debug, Default)]
pub struct UiState {
    /// Whether the chat panel is open.
    pub chat_open: bool,
}
