//! Share-link query strings.
//!
//! The checked tags, search and timezone of a state serialize to a query
//! string, and a query string applied to a freshly loaded state reproduces the
//! same view.

use url::form_urlencoded;

use crate::filter::FilterCategory;
use crate::predicate::parse_search;
use crate::state::State;

pub const SEARCH_KEY: &str = "search";
pub const TIMEZONE_KEY: &str = "tz";

/// Query string for the state's current view (without a leading `?`).
pub fn to_query(state: &State) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    for (category, _) in state.filters.iter() {
        let slugs: Vec<String> = state.filters.checked(category).map(|t| t.slug()).collect();
        if !slugs.is_empty() {
            serializer.append_pair(category.query_key(), &slugs.join(","));
        }
    }

    if !state.search.is_empty() {
        serializer.append_pair(SEARCH_KEY, &search_text(&state.search));
    }

    if !state.timezone.is_empty() {
        serializer.append_pair(TIMEZONE_KEY, &state.timezone);
    }

    serializer.finish()
}

/// Full share address: `base` plus the query, if any.
pub fn share_address(base: &str, state: &State) -> String {
    let query = to_query(state);
    if query.is_empty() {
        base.to_string()
    } else {
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{}{}{}", base, separator, query)
    }
}

/// Apply a query string to a state.
///
/// Tags are checked through the toggle engine, so exclusive categories keep
/// only the last value given. Unknown keys and tag slugs are ignored.
pub fn apply_query(state: &State, query: &str) -> State {
    let query = query.trim_start_matches('?');
    let mut next = state.clone();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if let Some(category) = FilterCategory::from_query_key(&key) {
            for slug in value.split(',').filter(|s| !s.is_empty()) {
                let tag = next
                    .filters
                    .find_by_slug(category, slug)
                    .map(|t| t.tag.clone());
                if let Some(tag) = tag {
                    next = next.toggle_tag(category, &tag, true);
                }
            }
        } else if key == SEARCH_KEY {
            next = next.with_search(parse_search(&value));
        } else if key == TIMEZONE_KEY {
            next = next.with_timezone(value.trim());
        }
    }

    next
}

/// Join tokens back into search input, quoting multi-word phrases.
pub fn search_text(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| {
            if t.contains(char::is_whitespace) {
                format!("\"{}\"", t)
            } else {
                t.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadOptions, load_json};

    fn catalog() -> State {
        let json = r#"[
            {"name": "A", "day": 1, "time": "08:00", "types": ["O", "BE"], "location": "Hall"},
            {"name": "B", "day": 2, "time": "19:00", "types": ["C"], "conference_url": "https://x"}
        ]"#;
        load_json(json, &LoadOptions::default()).unwrap()
    }

    #[test]
    fn empty_view_has_empty_query() {
        assert_eq!(to_query(&catalog()), "");
        assert_eq!(share_address("https://meetings.example.org/", &catalog()), "https://meetings.example.org/");
    }

    #[test]
    fn query_lists_checked_slugs_per_category() {
        let state = catalog()
            .toggle_tag(FilterCategory::Days, "Tuesday", true)
            .toggle_tag(FilterCategory::Formats, "In Person", true)
            .toggle_tag(FilterCategory::Types, "Open", true)
            .toggle_tag(FilterCategory::Types, "Newcomer", true)
            .with_search(vec!["big book".to_string(), "hall".to_string()])
            .with_timezone("America/New_York");

        assert_eq!(
            to_query(&state),
            "day=tuesday&format=in-person&type=newcomer%2Copen&search=%22big+book%22+hall&tz=America%2FNew_York"
        );
    }

    #[test]
    fn share_address_appends_to_existing_query() {
        let state = catalog().toggle_tag(FilterCategory::Days, "Monday", true);
        assert_eq!(share_address("https://x.org/?lang=en", &state), "https://x.org/?lang=en&day=monday");
        assert_eq!(share_address("https://x.org/", &state), "https://x.org/?day=monday");
    }

    #[test]
    fn applying_a_query_reproduces_the_view() {
        let original = catalog()
            .toggle_tag(FilterCategory::Formats, "Video", true)
            .toggle_tag(FilterCategory::Types, "Closed", true)
            .toggle_tag(FilterCategory::Times, "Morning", true)
            .with_search(vec!["big book".to_string()])
            .with_timezone("Europe/Berlin");

        let restored = apply_query(&catalog(), &format!("?{}", to_query(&original)));
        assert_eq!(restored.filters, original.filters);
        assert_eq!(restored.search, original.search);
        assert_eq!(restored.timezone, original.timezone);
    }

    #[test]
    fn exclusive_category_keeps_last_value() {
        let state = apply_query(&catalog(), "day=monday,tuesday");
        assert_eq!(state.active_tags(), vec!["Tuesday"]);
    }

    #[test]
    fn unknown_keys_and_slugs_are_ignored() {
        let state = apply_query(&catalog(), "region=north&type=caturday,open&day=");
        assert_eq!(state.active_tags(), vec!["Open"]);
    }
}
