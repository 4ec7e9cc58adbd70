//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`storyboard`, `composer`, `chat`, `ui`) so
//! individual components can depend on small focused models. Every mutation
//! is a plain method on the model, which keeps the transition rules
//! unit-testable without a reactive runtime.

pub mod chat;
pub mod composer;
pub mod storyboard;
pub mod ui;
