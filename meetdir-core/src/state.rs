//! Directory state.
//!
//! A [`State`] is a snapshot: every update builds a new value and the session
//! swaps it in. Nothing here edits a published state in place.

use crate::filter::{FilterCategory, Filters, active_tags};
use crate::meeting::Meeting;

/// Meetings shown per page when nothing else is configured.
pub const DEFAULT_MEETINGS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub filters: Filters,
    /// Number of filtered meetings currently shown.
    pub limit: usize,
    /// True until the catalog has been loaded.
    pub loading: bool,
    pub meetings: Vec<Meeting>,
    /// Lowercase search tokens.
    pub search: Vec<String>,
    /// IANA timezone id, or empty for each meeting's own timezone.
    pub timezone: String,
}

impl State {
    /// State before the catalog is fetched.
    pub fn initial(page_size: usize) -> Self {
        State {
            filters: Filters::default(),
            limit: page_size,
            loading: true,
            meetings: Vec::new(),
            search: Vec::new(),
            timezone: String::new(),
        }
    }

    /// State right after the catalog is loaded.
    pub fn loaded(filters: Filters, meetings: Vec<Meeting>) -> Self {
        State {
            filters,
            limit: DEFAULT_MEETINGS_PER_PAGE,
            loading: false,
            meetings,
            search: Vec::new(),
            timezone: String::new(),
        }
    }

    pub fn with_limit(self, limit: usize) -> Self {
        State { limit, ..self }
    }

    /// Set `value` in `category` to `checked`, honoring category exclusivity.
    pub fn toggle_tag(&self, category: FilterCategory, value: &str, checked: bool) -> Self {
        State {
            filters: self.filters.toggled(category, value, checked),
            ..self.clone()
        }
    }

    /// Replace the search tokens. Tokens are lowercased to match the
    /// meetings' search text.
    pub fn with_search(&self, search: Vec<String>) -> Self {
        State {
            search: search.into_iter().map(|t| t.to_lowercase()).collect(),
            ..self.clone()
        }
    }

    pub fn with_timezone(&self, timezone: impl Into<String>) -> Self {
        State {
            timezone: timezone.into(),
            ..self.clone()
        }
    }

    /// Show one more page. The limit only ever grows.
    pub fn load_more(&self, page_size: usize) -> Self {
        State {
            limit: self.limit + page_size,
            ..self.clone()
        }
    }

    /// Whether more filtered meetings exist beyond the limit.
    pub fn has_more(&self, filtered_len: usize) -> bool {
        filtered_len > self.limit
    }

    pub fn active_tags(&self) -> Vec<String> {
        active_tags(&self.filters)
    }

    pub fn find_meeting(&self, id: &str) -> Option<&Meeting> {
        self.meetings.iter().find(|m| m.id == id)
    }
}

/// The slice of `filtered` currently shown.
pub fn visible<'s, 'm>(filtered: &'s [&'m Meeting], limit: usize) -> &'s [&'m Meeting] {
    &filtered[..limit.min(filtered.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadOptions, load_json};

    fn loaded() -> State {
        let json = r#"[
            {"name": "A", "day": 1, "time": "08:00", "types": ["O"]},
            {"name": "B", "day": 2, "time": "19:00", "types": ["C"]}
        ]"#;
        load_json(json, &LoadOptions::default()).unwrap().with_limit(5)
    }

    #[test]
    fn initial_state_is_loading() {
        let state = State::initial(10);
        assert!(state.loading);
        assert_eq!(state.limit, 10);
        assert_eq!(state.filters.iter().count(), 4);
        assert!(state.meetings.is_empty());
    }

    #[test]
    fn load_more_adds_exactly_one_page() {
        let state = loaded();
        assert_eq!(state.load_more(5).limit, 10);
        assert_eq!(state.load_more(5).load_more(5).limit, 15);
    }

    #[test]
    fn limit_survives_filter_and_search_changes() {
        let state = loaded().load_more(5);
        let state = state
            .toggle_tag(FilterCategory::Days, "Monday", true)
            .with_search(vec!["a".to_string()])
            .with_timezone("Europe/Paris");
        assert_eq!(state.limit, 10);
    }

    #[test]
    fn updates_leave_previous_snapshot_untouched() {
        let before = loaded();
        let after = before.toggle_tag(FilterCategory::Types, "Open", true);
        assert!(before.active_tags().is_empty());
        assert_eq!(after.active_tags(), vec!["Open"]);
    }

    #[test]
    fn search_tokens_are_lowercased() {
        let state = loaded().with_search(vec!["Big".to_string(), "BOOK study".to_string()]);
        assert_eq!(state.search, vec!["big", "book study"]);
    }

    #[test]
    fn has_more_compares_against_limit() {
        let state = loaded();
        assert!(!state.has_more(5));
        assert!(state.has_more(6));
    }

    #[test]
    fn visible_is_bounded_by_filtered_len() {
        let state = loaded();
        let all: Vec<&Meeting> = state.meetings.iter().collect();
        assert_eq!(visible(&all, 1).len(), 1);
        assert_eq!(visible(&all, 50).len(), 2);
    }
}
