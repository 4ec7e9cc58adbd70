//! Storyboard session state: the ordered entry list, selection, pending
//! suggestions, and busy/error flags.
//!
//! DESIGN
//! ======
//! Entries are append-only and never mutated in place; deletion is the only
//! removal. Selection always references an existing entry or is cleared,
//! and defaults to the most recently added entry when unset. Suggestions
//! are discarded the instant a new generation begins so they can never be
//! shown stale against a newer prompt.

#[cfg(test)]
#[path = "storyboard_test.rs"]
mod storyboard_test;

use crate::net::types::Suggestion;

/// One generated or uploaded image plus its originating prompt, in sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoryboardEntry {
    /// Unique, order-stable identifier (UUID string).
    pub id: String,
    /// Image payload as a data URL.
    pub src: String,
    /// Originating prompt text, pre-style-suffix.
    pub prompt: String,
}

/// Storyboard state: entries, selection, suggestions, and busy/error flags.
///
/// Fields are read by components through an `RwSignal` context; mutations go
/// through the methods below.
#[derive(Clone, Debug, Default)]
pub struct StoryboardState {
    /// Ordered list of storyboard entries.
    pub entries: Vec<StoryboardEntry>,
    /// Explicitly selected entry ID, if any.
    pub selected_id: Option<String>,
    /// Current suggestion batch. Replaced wholesale; never persisted.
    pub suggestions: Option<Vec<Suggestion>>,
    /// True while an image generation request is outstanding.
    pub generating: bool,
    /// True while a suggestion request is outstanding.
    pub suggesting: bool,
    /// Last user-facing error, shown in the banner until the next request.
    pub error: Option<String>,
}

impl StoryboardState {
    /// The current entry: the explicit selection when set, otherwise the
    /// most recently added entry.
    #[must_use]
    pub fn current_entry(&self) -> Option<&StoryboardEntry> {
        if let Some(id) = &self.selected_id {
            return self.entries.iter().find(|e| e.id == *id);
        }
        self.entries.last()
    }

    /// 1-based sequence position of an entry, if present.
    #[must_use]
    pub fn sequence_number(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id).map(|i| i + 1)
    }

    /// Append an entry to the end of the list and make it the selection.
    pub fn push_entry(&mut self, entry: StoryboardEntry) {
        self.selected_id = Some(entry.id.clone());
        self.entries.push(entry);
    }

    /// Select an existing entry. Unknown IDs are ignored so the selection
    /// invariant cannot be broken by a stale click.
    pub fn select(&mut self, id: &str) {
        if self.entries.iter().any(|e| e.id == id) {
            self.selected_id = Some(id.to_string());
        }
    }

    /// Delete an entry. Deleting the selected entry selects the new last
    /// entry (or clears the selection if the list becomes empty); deleting
    /// a non-selected entry never changes the selection.
    pub fn delete_entry(&mut self, id: &str) {
        self.entries.retain(|e| e.id != id);
        if self.selected_id.as_deref() == Some(id) {
            self.selected_id = self.entries.last().map(|e| e.id.clone());
        }
    }

    /// Start a generation: clears suggestions and the error banner, and
    /// raises the busy flag that blocks duplicate submission.
    pub fn begin_generation(&mut self) {
        self.suggestions = None;
        self.error = None;
        self.generating = true;
    }

    /// Complete a generation with its new entry.
    pub fn finish_generation(&mut self, entry: StoryboardEntry) {
        self.push_entry(entry);
        self.generating = false;
    }

    /// Abort a generation with a user-facing message.
    pub fn fail_generation(&mut self, message: impl Into<String>) {
        self.generating = false;
        self.error = Some(message.into());
    }

    /// Start a suggestion fetch.
    pub fn begin_suggest(&mut self) {
        self.suggesting = true;
    }

    /// Replace the suggestion batch wholesale.
    pub fn set_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = Some(suggestions);
        self.suggesting = false;
    }

    /// Report a suggestion failure. The already-added entry stands.
    pub fn fail_suggest(&mut self, message: impl Into<String>) {
        self.suggesting = false;
        self.error = Some(message.into());
    }

    /// Clear busy flags after a transport loss so the UI does not stay
    /// stuck waiting for replies that will never arrive.
    pub fn abort_in_flight(&mut self) {
        self.generating = false;
        self.suggesting = false;
    }
}
