//! Meeting catalog loading.
//!
//! Turns the raw JSON catalog (an array of meetings in the Meeting Guide
//! format) into a loaded [`State`]: normalized meetings plus every distinct
//! tag value observed per category, all unchecked.

use std::collections::HashSet;

use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{MeetDirError, MeetDirResult};
use crate::filter::{FilterCategory, Filters};
use crate::meeting::{
    self, DAY_NAMES, FORMAT_NAMES, IN_PERSON, Meeting, MeetingTags, PHONE, TIME_NAMES, VIDEO,
};
use crate::state::State;

/// Meeting Guide type codes and their display names.
const TYPE_NAMES: &[(&str, &str)] = &[
    ("11", "11th Step Meditation"),
    ("12x12", "12 Steps & 12 Traditions"),
    ("A", "Secular"),
    ("B", "Big Book"),
    ("BE", "Newcomer"),
    ("C", "Closed"),
    ("CAN", "Candlelight"),
    ("D", "Discussion"),
    ("DR", "Daily Reflections"),
    ("GR", "Grapevine"),
    ("H", "Birthday"),
    ("LGBTQ", "LGBTQ"),
    ("LIT", "Literature"),
    ("M", "Men"),
    ("MED", "Meditation"),
    ("O", "Open"),
    ("SP", "Speaker"),
    ("ST", "Step Study"),
    ("TR", "Tradition Study"),
    ("W", "Women"),
    ("X", "Wheelchair Access"),
    ("Y", "Young People"),
];

/// Type code marking a venue that is temporarily closed.
const TEMPORARY_CLOSURE: &str = "TC";

/// Options applied while loading.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Timezone for meetings that don't declare one.
    pub default_timezone: Option<Tz>,
}

/// A catalog entry as it appears in the data feed.
#[derive(Debug, Deserialize)]
pub struct RawMeeting {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub day: Option<RawDay>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub conference_url: Option<String>,
    #[serde(default)]
    pub conference_phone: Option<String>,
}

/// Feeds use either a day index (0 = Sunday) or a weekday name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawDay {
    Index(u8),
    Name(String),
}

/// Parse and load a JSON catalog.
pub fn load_json(text: &str, options: &LoadOptions) -> MeetDirResult<State> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    load(value, options)
}

/// Load a parsed JSON catalog.
pub fn load(payload: serde_json::Value, options: &LoadOptions) -> MeetDirResult<State> {
    if !payload.is_array() {
        return Err(MeetDirError::Parse(
            "expected a JSON array of meetings".to_string(),
        ));
    }

    let entries: Vec<serde_json::Value> = serde_json::from_value(payload)?;

    // One malformed record must not hide the rest of the catalog.
    let raw = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<RawMeeting>(entry) {
            Ok(raw) => Some((index, raw)),
            Err(error) => {
                tracing::warn!(index, %error, "skipping malformed meeting");
                None
            }
        })
        .collect();

    Ok(build_state(raw, options))
}

/// Normalize raw meetings into a loaded state.
pub fn load_meetings(raw: Vec<RawMeeting>, options: &LoadOptions) -> State {
    build_state(raw.into_iter().enumerate().collect(), options)
}

/// `raw` pairs each record with its position in the catalog.
fn build_state(raw: Vec<(usize, RawMeeting)>, options: &LoadOptions) -> State {
    let mut seen_ids = HashSet::new();
    let mut meetings: Vec<Meeting> = raw
        .into_iter()
        .map(|(index, raw)| normalize(raw, index, options, &mut seen_ids))
        .collect();

    meetings.sort_by(|a, b| {
        sort_key(a)
            .cmp(&sort_key(b))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    let filters = collect_filters(&meetings);

    tracing::debug!(
        meetings = meetings.len(),
        tags = filters.iter().map(|(_, tags)| tags.len()).sum::<usize>(),
        "catalog loaded"
    );

    State::loaded(filters, meetings)
}

fn normalize(
    raw: RawMeeting,
    index: usize,
    options: &LoadOptions,
    seen_ids: &mut HashSet<String>,
) -> Meeting {
    let name = non_empty(raw.name).unwrap_or_else(|| "Unnamed meeting".to_string());

    let id = match non_empty(raw.slug) {
        Some(slug) if !seen_ids.contains(&slug) => slug,
        _ => format!("meeting-{}", index + 1),
    };
    seen_ids.insert(id.clone());

    let day = raw.day.and_then(parse_day);
    let time = raw.time.as_deref().and_then(parse_time);
    let end_time = raw.end_time.as_deref().and_then(parse_time);

    let timezone = non_empty(raw.timezone)
        .and_then(|tz| match tz.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                tracing::warn!(meeting = %id, timezone = %tz, "ignoring unknown timezone");
                None
            }
        })
        .or(options.default_timezone);

    let location = non_empty(raw.location);
    let address = non_empty(raw.formatted_address);
    let notes = non_empty(raw.notes);
    let conference_url = non_empty(raw.conference_url);
    let conference_phone = non_empty(raw.conference_phone);

    let temporarily_closed = raw.types.iter().any(|t| t == TEMPORARY_CLOSURE);
    let types: Vec<String> = raw
        .types
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty() && *t != TEMPORARY_CLOSURE)
        .map(type_name)
        .collect();

    let mut formats = Vec::new();
    if (address.is_some() || location.is_some()) && !temporarily_closed {
        formats.push(IN_PERSON.to_string());
    }
    if conference_url.is_some() {
        formats.push(VIDEO.to_string());
    }
    if conference_phone.is_some() {
        formats.push(PHONE.to_string());
    }

    let tags = MeetingTags {
        days: day.map(|d| vec![meeting::day_name(d).to_string()]).unwrap_or_default(),
        times: time
            .map(|t| meeting::time_buckets(t).into_iter().map(String::from).collect())
            .unwrap_or_default(),
        formats,
        types: types.clone(),
    };

    let search_text = [
        Some(name.as_str()),
        location.as_deref(),
        address.as_deref(),
        notes.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::to_string)
    .chain(types.iter().cloned())
    .collect::<Vec<_>>()
    .join("\n")
    .to_lowercase();

    Meeting {
        id,
        name,
        day,
        time,
        end_time,
        timezone,
        location,
        address,
        notes,
        conference_url,
        conference_phone,
        types,
        tags,
        search_text,
    }
}

/// Distinct tags per category. Days, times and formats follow their fixed
/// display order; types are alphabetical.
fn collect_filters(meetings: &[Meeting]) -> Filters {
    let observed = |category: FilterCategory| -> HashSet<&str> {
        meetings
            .iter()
            .flat_map(|m| m.tags.get(category).iter().map(String::as_str))
            .collect()
    };

    let ordered = |category: FilterCategory, order: &[&str]| -> Vec<String> {
        let seen = observed(category);
        order
            .iter()
            .filter(|name| seen.contains(*name))
            .map(|name| name.to_string())
            .collect()
    };

    let mut types: Vec<String> = observed(FilterCategory::Types)
        .into_iter()
        .map(String::from)
        .collect();
    types.sort_by_key(|t| t.to_lowercase());

    Filters::from_tags([
        (FilterCategory::Days, ordered(FilterCategory::Days, &DAY_NAMES)),
        (FilterCategory::Times, ordered(FilterCategory::Times, &TIME_NAMES)),
        (FilterCategory::Formats, ordered(FilterCategory::Formats, &FORMAT_NAMES)),
        (FilterCategory::Types, types),
    ])
}

/// Timed meetings first by day (Sunday first) and time; untimed last.
fn sort_key(meeting: &Meeting) -> (bool, u32, Option<NaiveTime>) {
    (
        meeting.day.is_none(),
        meeting.day.map(|d| d.num_days_from_sunday()).unwrap_or(0),
        meeting.time,
    )
}

fn parse_day(day: RawDay) -> Option<Weekday> {
    match day {
        RawDay::Index(i) => meeting::weekday_from_index(i),
        RawDay::Name(name) => {
            let name = name.trim();
            if let Ok(i) = name.parse::<u8>() {
                return meeting::weekday_from_index(i);
            }
            name.parse::<Weekday>().ok()
        }
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

fn type_name(code: &str) -> String {
    TYPE_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.to_string())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
