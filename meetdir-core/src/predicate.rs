//! Matching meetings against checked tags, search terms and timezone.

use chrono_tz::Tz;

use crate::filter::FilterCategory;
use crate::meeting::Meeting;
use crate::state::State;

/// Meetings of `state` that match, in catalog order.
///
/// Within a category any checked tag matches; across categories every
/// category with a checked tag must match. Every search token must appear in
/// the meeting's text. A selected timezone keeps meetings that can be placed
/// in it (untimed, or with a known native timezone); an unknown timezone id
/// imposes no constraint.
pub fn filter<'a>(state: &'a State, active_tags: &[String]) -> Vec<&'a Meeting> {
    let constraints: Vec<(FilterCategory, Vec<&str>)> = state
        .filters
        .iter()
        .map(|(category, tags)| {
            let checked = tags
                .iter()
                .map(|t| t.tag.as_str())
                .filter(|tag| active_tags.iter().any(|a| a == tag))
                .collect::<Vec<_>>();
            (category, checked)
        })
        .filter(|(_, checked)| !checked.is_empty())
        .collect();

    let timezone = selected_timezone(&state.timezone);

    state
        .meetings
        .iter()
        .filter(|meeting| {
            constraints.iter().all(|(category, checked)| {
                checked.iter().any(|tag| meeting.has_tag(*category, tag))
            })
        })
        .filter(|meeting| state.search.iter().all(|token| meeting.matches_token(token)))
        .filter(|meeting| timezone.is_none() || fits_timezone(meeting))
        .collect()
}

/// The selected display timezone, if the state names a known one.
pub fn selected_timezone(timezone: &str) -> Option<Tz> {
    if timezone.is_empty() {
        return None;
    }
    timezone.parse().ok()
}

fn fits_timezone(meeting: &Meeting) -> bool {
    !meeting.is_timed() || meeting.timezone.is_some()
}

/// Split search input into lowercase tokens, keeping "quoted phrases" whole.
pub fn parse_search(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for (i, part) in input.split('"').enumerate() {
        if i % 2 == 1 {
            let phrase = part.trim().to_lowercase();
            if !phrase.is_empty() {
                tokens.push(phrase);
            }
        } else {
            tokens.extend(part.split_whitespace().map(str::to_lowercase));
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadOptions, load_json};

    fn catalog() -> State {
        let json = r#"[
            {"slug": "mon-video", "name": "Monday Video", "day": 1, "time": "19:00",
             "conference_url": "https://zoom.us/j/1", "types": ["O"], "timezone": "America/New_York"},
            {"slug": "tue-phone", "name": "Tuesday Phone", "day": 2, "time": "08:00",
             "conference_phone": "+15550100", "types": ["C"], "timezone": "America/New_York"},
            {"slug": "mon-phone", "name": "Monday Phone", "day": 1, "time": "12:00",
             "conference_phone": "+15550101", "types": ["O", "SP"], "notes": "Big Book study"},
            {"slug": "anytime", "name": "Anytime Phone", "conference_phone": "+15550102"}
        ]"#;
        load_json(json, &LoadOptions::default()).unwrap()
    }

    fn ids(meetings: &[&Meeting]) -> Vec<String> {
        meetings.iter().map(|m| m.id.clone()).collect()
    }

    // --- tags ---

    #[test]
    fn no_constraints_returns_full_catalog_in_order() {
        let state = catalog();
        let all = filter(&state, &[]);
        assert_eq!(ids(&all), vec!["mon-phone", "mon-video", "tue-phone", "anytime"]);
    }

    #[test]
    fn and_across_categories() {
        let state = catalog()
            .toggle_tag(FilterCategory::Days, "Monday", true)
            .toggle_tag(FilterCategory::Formats, "Phone", true);
        let result = filter(&state, &state.active_tags());
        assert_eq!(ids(&result), vec!["mon-phone"]);
    }

    #[test]
    fn or_within_a_category() {
        let state = catalog()
            .toggle_tag(FilterCategory::Types, "Closed", true)
            .toggle_tag(FilterCategory::Types, "Speaker", true);
        let result = filter(&state, &state.active_tags());
        assert_eq!(ids(&result), vec!["mon-phone", "tue-phone"]);
    }

    #[test]
    fn unrelated_active_tags_are_ignored() {
        let state = catalog();
        let result = filter(&state, &["Caturday".to_string()]);
        assert_eq!(result.len(), 4);
    }

    // --- search ---

    #[test]
    fn all_search_tokens_must_match() {
        let state = catalog().with_search(parse_search("monday book"));
        assert_eq!(ids(&filter(&state, &[])), vec!["mon-phone"]);

        let state = catalog().with_search(parse_search("phone"));
        assert_eq!(
            ids(&filter(&state, &[])),
            vec!["mon-phone", "tue-phone", "anytime"]
        );
    }

    #[test]
    fn search_matches_type_names() {
        let state = catalog().with_search(parse_search("closed"));
        assert_eq!(ids(&filter(&state, &[])), vec!["tue-phone"]);
    }

    // --- timezone ---

    #[test]
    fn timezone_keeps_placeable_meetings() {
        let state = catalog().with_timezone("Europe/London");
        assert_eq!(
            ids(&filter(&state, &[])),
            vec!["mon-video", "tue-phone", "anytime"]
        );
    }

    #[test]
    fn unknown_timezone_imposes_nothing() {
        let state = catalog().with_timezone("Nowhere/Special");
        assert_eq!(filter(&state, &[]).len(), 4);
        assert_eq!(selected_timezone("Nowhere/Special"), None);
        assert_eq!(selected_timezone(""), None);
    }

    // --- parse_search ---

    #[test]
    fn parse_search_splits_and_lowercases() {
        assert_eq!(parse_search("  Big   BOOK "), vec!["big", "book"]);
        assert!(parse_search("   ").is_empty());
    }

    #[test]
    fn parse_search_keeps_quoted_phrases() {
        assert_eq!(
            parse_search(r#"step "Big Book" study"#),
            vec!["step", "big book", "study"]
        );
        assert_eq!(parse_search(r#""unterminated phrase"#), vec!["unterminated phrase"]);
    }
}
