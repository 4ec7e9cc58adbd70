//! Page-level layouts.

pub mod storyboard;
