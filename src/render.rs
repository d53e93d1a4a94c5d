//! Terminal rendering for meetdir types.
//!
//! Extension traits that add colored output to meetdir-core types using
//! owo_colors.

use std::ops::Range;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use meetdir_core::filter::{FilterCategory, Filters};
use meetdir_core::meeting::{self, Meeting};
use meetdir_core::session::View;
use owo_colors::OwoColorize;

/// Context shared by everything rendered for one view.
pub struct RenderContext {
    /// Selected display timezone, if any.
    pub timezone: Option<Tz>,
    pub now: DateTime<Utc>,
    pub active_tags: Vec<String>,
    /// Lowercase search tokens, highlighted where they match.
    pub search: Vec<String>,
}

pub trait Render {
    fn render(&self, ctx: &RenderContext) -> String;
}

impl Render for Meeting {
    fn render(&self, ctx: &RenderContext) -> String {
        let mut lines = vec![format!(
            "{} {} {}",
            format_when(self, ctx).bold(),
            highlight_matches(&self.name, &ctx.search),
            format!("[{}]", self.id).dimmed()
        )];

        let place = match (&self.location, &self.address) {
            (Some(loc), Some(addr)) => Some(format!("{}, {}", loc, addr)),
            (Some(loc), None) => Some(loc.clone()),
            (None, Some(addr)) => Some(addr.clone()),
            (None, None) => None,
        };
        if let Some(place) = place {
            lines.push(format!("   {}", highlight_matches(&place, &ctx.search)));
        }

        let tags: Vec<String> = self
            .tags
            .formats
            .iter()
            .chain(self.types.iter())
            .map(|t| highlight_tag(t, &ctx.active_tags))
            .collect();
        if !tags.is_empty() {
            lines.push(format!("   {}", tags.join(" · ")));
        }

        lines.join("\n")
    }
}

fn highlight_tag(tag: &str, active_tags: &[String]) -> String {
    if active_tags.iter().any(|a| a == tag) {
        tag.green().bold().to_string()
    } else {
        tag.dimmed().to_string()
    }
}

/// Byte ranges of `text` matched by any search token, merged and in order.
fn match_ranges(text: &str, tokens: &[String]) -> Vec<Range<usize>> {
    let lower = text.to_lowercase();
    // Offsets in the lowercased text only map back when lengths agree.
    if lower.len() != text.len() {
        return Vec::new();
    }

    let mut ranges: Vec<Range<usize>> = tokens
        .iter()
        .filter(|t| !t.is_empty())
        .flat_map(|token| {
            lower
                .match_indices(token.as_str())
                .map(|(start, m)| start..start + m.len())
                .collect::<Vec<_>>()
        })
        .filter(|r| text.is_char_boundary(r.start) && text.is_char_boundary(r.end))
        .collect();
    ranges.sort_by_key(|r| r.start);

    let mut merged: Vec<Range<usize>> = Vec::new();
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

fn highlight_matches(text: &str, tokens: &[String]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    for range in match_ranges(text, tokens) {
        out.push_str(&text[pos..range.start]);
        out.push_str(&(&text[range.clone()]).yellow().bold().to_string());
        pos = range.end;
    }
    out.push_str(&text[pos..]);
    out
}

/// Day and time label. With a selected timezone the next occurrence is
/// converted into it; otherwise the meeting's own day and time are shown.
fn format_when(meeting: &Meeting, ctx: &RenderContext) -> String {
    if let Some(target) = ctx.timezone {
        if let Some(start) = meeting.next_start_in(target, ctx.now) {
            let day = start.format("%A").to_string();
            let time = start.format("%H:%M").to_string();
            return format!("{:<9} {:>5}", day, time);
        }
    }

    let day = meeting.day.map(meeting::day_name).unwrap_or("Any day");
    let time = meeting
        .time
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string());
    format!("{:<9} {:>5}", day, time)
}

/// Render a view of the directory.
pub fn render_view(view: &View, ctx: &RenderContext) -> String {
    match view {
        View::Loading => "Loading meetings…".dimmed().to_string(),
        View::NoResults { active_tags } => {
            let mut lines = vec!["No meetings found".yellow().to_string()];
            if !active_tags.is_empty() {
                lines.push(format!(
                    "{} {}",
                    "Try removing:".dimmed(),
                    active_tags.join(", ")
                ));
            }
            lines.join("\n")
        }
        View::Results {
            meetings,
            total,
            has_more,
            ..
        } => {
            let mut lines: Vec<String> = meetings.iter().map(|m| m.render(ctx)).collect();
            let summary = format!(
                "Showing {} of {} {}",
                meetings.len(),
                total,
                pluralize("meeting", *total)
            );
            lines.push(String::new());
            if *has_more {
                lines.push(format!("{} {}", summary.dimmed(), "(more available)".dimmed()));
            } else {
                lines.push(summary.dimmed().to_string());
            }
            lines.join("\n")
        }
    }
}

/// Render the tag lists of every category, checked tags marked.
pub fn render_filters(filters: &Filters, counts: impl Fn(FilterCategory, &str) -> usize) -> String {
    let mut lines = Vec::new();

    for (category, tags) in filters.iter() {
        let mode = if category.is_exclusive() { "one of" } else { "any of" };
        lines.push(format!("{} {}", category.key().bold(), format!("({})", mode).dimmed()));

        if tags.is_empty() {
            lines.push(format!("   {}", "(none)".dimmed()));
        }
        for tag in tags {
            let mark = if tag.checked { "[x]".green().to_string() } else { "[ ]".to_string() };
            let count = format!("({})", counts(category, &tag.tag));
            lines.push(format!("   {} {} {}", mark, tag.tag, count.dimmed()));
        }
    }

    lines.join("\n")
}

/// Simple pluralization helper
fn pluralize(word: &str, count: usize) -> &str {
    if count == 1 {
        word
    } else {
        match word {
            "meeting" => "meetings",
            _ => word,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use meetdir_core::loader::{LoadOptions, load_json};

    fn meetings() -> Vec<Meeting> {
        let json = r#"[
            {"slug": "wed", "name": "Wednesday Night", "day": 3, "time": "19:00",
             "timezone": "America/New_York", "location": "Hall", "types": ["O"]},
            {"slug": "any", "name": "By Appointment"}
        ]"#;
        load_json(json, &LoadOptions::default()).unwrap().meetings
    }

    fn ctx(timezone: Option<Tz>) -> RenderContext {
        RenderContext {
            timezone,
            now: Utc.with_ymd_and_hms(2026, 3, 16, 12, 0, 0).unwrap(),
            active_tags: Vec::new(),
            search: Vec::new(),
        }
    }

    #[test]
    fn native_day_and_time_without_timezone() {
        let meetings = meetings();
        let m = &meetings[0];
        assert_eq!(format_when(m, &ctx(None)), "Wednesday 19:00");
    }

    #[test]
    fn converted_into_selected_timezone() {
        let meetings = meetings();
        let m = &meetings[0];
        let when = format_when(m, &ctx(Some(chrono_tz::Asia::Tokyo)));
        assert_eq!(when, "Thursday  08:00");
    }

    #[test]
    fn untimed_meeting_label() {
        let meetings = meetings();
        let m = &meetings[1];
        assert_eq!(format_when(m, &ctx(Some(chrono_tz::Asia::Tokyo))), "Any day   --:--");
    }

    // --- search highlighting ---

    #[test]
    fn search_matches_are_found_case_insensitively() {
        let tokens = vec!["book".to_string(), "big".to_string()];
        assert_eq!(match_ranges("Big Book Study", &tokens), vec![0..3, 4..8]);
    }

    #[test]
    fn overlapping_matches_merge() {
        let tokens = vec!["night".to_string(), "ght gr".to_string()];
        assert_eq!(match_ranges("Night Group", &tokens), vec![0..8]);
    }

    #[test]
    fn highlighted_text_keeps_unmatched_parts() {
        let tokens = vec!["hall".to_string()];
        let out = highlight_matches("Church Hall", &tokens);
        assert!(out.starts_with("Church "));
        assert!(out.contains(&"Hall".yellow().bold().to_string()));
        assert_eq!(highlight_matches("Church Hall", &[]), "Church Hall");
    }

    #[test]
    fn rendered_meeting_highlights_search() {
        let meetings = meetings();
        let mut ctx = ctx(None);
        ctx.search = vec!["hall".to_string()];
        let out = meetings[0].render(&ctx);
        assert!(out.contains(&"Hall".yellow().bold().to_string()), "{}", out);
    }

    #[test]
    fn pluralizes_meeting() {
        assert_eq!(pluralize("meeting", 1), "meeting");
        assert_eq!(pluralize("meeting", 2), "meetings");
    }
}
