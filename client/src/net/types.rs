//! Shared wire-protocol DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! These types intentionally mirror server frame payloads so serde
//! round-trips stay lossless and frame dispatch can remain schema-driven.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

pub use frames::Frame;
pub use frames::Status as FrameStatus;

/// A categorized candidate prompt for the next scene, as delivered by the
/// `scene:suggest` done frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// One of the fixed category labels.
    pub category: String,
    /// The descriptive prompt for the next scene.
    pub prompt: String,
}
