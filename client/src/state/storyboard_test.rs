use super::*;

fn entry(id: &str) -> StoryboardEntry {
    StoryboardEntry {
        id: id.to_string(),
        src: format!("data:image/png;base64,{id}"),
        prompt: format!("prompt for {id}"),
    }
}

fn suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion { category: "Camera Shot".into(), prompt: "wide shot".into() },
        Suggestion { category: "Action/Movement".into(), prompt: "she runs".into() },
        Suggestion { category: "Detail Focus".into(), prompt: "the keys".into() },
    ]
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_state_is_empty_and_idle() {
    let state = StoryboardState::default();
    assert!(state.entries.is_empty());
    assert!(state.selected_id.is_none());
    assert!(state.suggestions.is_none());
    assert!(!state.generating);
    assert!(!state.suggesting);
    assert!(state.error.is_none());
    assert!(state.current_entry().is_none());
}

// =============================================================
// Append + selection
// =============================================================

#[test]
fn push_entry_appends_to_end_and_selects() {
    let mut state = StoryboardState::default();
    state.push_entry(entry("a"));
    state.push_entry(entry("b"));

    assert_eq!(state.entries.len(), 2);
    assert_eq!(state.entries[1].id, "b");
    assert_eq!(state.selected_id.as_deref(), Some("b"));
    assert_eq!(state.current_entry().unwrap().id, "b");
}

#[test]
fn current_entry_defaults_to_last_without_selection() {
    let mut state = StoryboardState::default();
    state.entries.push(entry("a"));
    state.entries.push(entry("b"));

    assert_eq!(state.current_entry().unwrap().id, "b");
}

#[test]
fn select_switches_current_entry() {
    let mut state = StoryboardState::default();
    state.push_entry(entry("a"));
    state.push_entry(entry("b"));
    state.select("a");

    assert_eq!(state.current_entry().unwrap().id, "a");
}

#[test]
fn select_unknown_id_is_ignored() {
    let mut state = StoryboardState::default();
    state.push_entry(entry("a"));
    state.select("ghost");

    assert_eq!(state.selected_id.as_deref(), Some("a"));
}

#[test]
fn sequence_numbers_are_one_based_in_list_order() {
    let mut state = StoryboardState::default();
    state.push_entry(entry("a"));
    state.push_entry(entry("b"));

    assert_eq!(state.sequence_number("a"), Some(1));
    assert_eq!(state.sequence_number("b"), Some(2));
    assert_eq!(state.sequence_number("ghost"), None);
}

// =============================================================
// Deletion
// =============================================================

#[test]
fn deleting_selected_entry_selects_new_last() {
    let mut state = StoryboardState::default();
    state.push_entry(entry("a"));
    state.push_entry(entry("b"));
    state.push_entry(entry("c"));

    state.delete_entry("c");

    assert_eq!(state.entries.len(), 2);
    assert_eq!(state.selected_id.as_deref(), Some("b"));
}

#[test]
fn deleting_last_remaining_entry_clears_selection() {
    let mut state = StoryboardState::default();
    state.push_entry(entry("a"));

    state.delete_entry("a");

    assert!(state.entries.is_empty());
    assert!(state.selected_id.is_none());
    assert!(state.current_entry().is_none());
}

#[test]
fn deleting_non_selected_entry_keeps_selection() {
    let mut state = StoryboardState::default();
    state.push_entry(entry("a"));
    state.push_entry(entry("b"));
    state.select("a");

    state.delete_entry("b");

    assert_eq!(state.selected_id.as_deref(), Some("a"));
    assert_eq!(state.current_entry().unwrap().id, "a");
}

#[test]
fn deleting_unknown_id_is_a_no_op() {
    let mut state = StoryboardState::default();
    state.push_entry(entry("a"));

    state.delete_entry("ghost");

    assert_eq!(state.entries.len(), 1);
    assert_eq!(state.selected_id.as_deref(), Some("a"));
}

// =============================================================
// Generation lifecycle
// =============================================================

#[test]
fn begin_generation_clears_suggestions_and_error() {
    let mut state = StoryboardState::default();
    state.set_suggestions(suggestions());
    state.error = Some("old error".into());

    state.begin_generation();

    assert!(state.suggestions.is_none());
    assert!(state.error.is_none());
    assert!(state.generating);
}

#[test]
fn finish_generation_appends_exactly_one_entry() {
    let mut state = StoryboardState::default();
    state.begin_generation();

    state.finish_generation(entry("a"));

    assert_eq!(state.entries.len(), 1);
    assert_eq!(state.entries[0].prompt, "prompt for a");
    assert_eq!(state.selected_id.as_deref(), Some("a"));
    assert!(!state.generating);
}

#[test]
fn fail_generation_sets_error_and_adds_nothing() {
    let mut state = StoryboardState::default();
    state.begin_generation();

    state.fail_generation("Failed to generate image.");

    assert!(state.entries.is_empty());
    assert!(!state.generating);
    assert_eq!(state.error.as_deref(), Some("Failed to generate image."));
}

// =============================================================
// Suggestion lifecycle
// =============================================================

#[test]
fn set_suggestions_replaces_wholesale() {
    let mut state = StoryboardState::default();
    state.begin_suggest();
    state.set_suggestions(suggestions());

    let mut second = suggestions();
    second.truncate(3);
    second[0].prompt = "different".into();
    state.set_suggestions(second);

    let current = state.suggestions.as_ref().unwrap();
    assert_eq!(current[0].prompt, "different");
    assert!(!state.suggesting);
}

#[test]
fn suggestion_failure_keeps_generated_entry() {
    let mut state = StoryboardState::default();
    state.begin_generation();
    state.finish_generation(entry("a"));
    state.begin_suggest();

    state.fail_suggest("Failed to fetch suggestions, but image was generated.");

    assert_eq!(state.entries.len(), 1);
    assert!(state.error.is_some());
    assert!(!state.suggesting);
}

// =============================================================
// Transport loss
// =============================================================

#[test]
fn abort_in_flight_clears_busy_flags_only() {
    let mut state = StoryboardState::default();
    state.push_entry(entry("a"));
    state.begin_generation();
    state.begin_suggest();

    state.abort_in_flight();

    assert!(!state.generating);
    assert!(!state.suggesting);
    assert_eq!(state.entries.len(), 1);
}
