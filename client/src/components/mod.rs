//! View components for the storyboard workspace.

pub mod chat_widget;
pub mod composer_panel;
pub mod header;
pub mod scene_viewer;
pub mod suggestion_panel;
pub mod timeline;
