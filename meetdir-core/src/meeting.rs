//! Normalized meeting records.
//!
//! Meetings are produced by the loader from the raw catalog. Each one carries
//! the tag values it contributes to every filter category, so matching a
//! meeting against checked tags never has to re-derive them.

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::filter::FilterCategory;

/// Day tags, in display order. Sunday is day 0 in the catalog format.
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub const MORNING: &str = "Morning";
pub const MIDDAY: &str = "Midday";
pub const AFTERNOON: &str = "Afternoon";
pub const EVENING: &str = "Evening";
pub const NIGHT: &str = "Night";

/// Time-of-day tags, in display order.
pub const TIME_NAMES: [&str; 5] = [MORNING, MIDDAY, AFTERNOON, EVENING, NIGHT];

pub const IN_PERSON: &str = "In Person";
pub const VIDEO: &str = "Video";
pub const PHONE: &str = "Phone";

/// Format tags, in display order.
pub const FORMAT_NAMES: [&str; 3] = [IN_PERSON, VIDEO, PHONE];

/// Meeting length assumed when the catalog gives no end time.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// A meeting in the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Meeting {
    /// Stable identity: the catalog slug, or one assigned by the loader.
    pub id: String,
    pub name: String,
    pub day: Option<Weekday>,
    pub time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Native timezone of the meeting, if known.
    pub timezone: Option<Tz>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub conference_url: Option<String>,
    pub conference_phone: Option<String>,
    /// Type names (codes already expanded).
    pub types: Vec<String>,
    pub tags: MeetingTags,
    pub(crate) search_text: String,
}

/// Tag values a meeting carries, per category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingTags {
    pub days: Vec<String>,
    pub times: Vec<String>,
    pub formats: Vec<String>,
    pub types: Vec<String>,
}

impl MeetingTags {
    pub fn get(&self, category: FilterCategory) -> &[String] {
        match category {
            FilterCategory::Days => &self.days,
            FilterCategory::Times => &self.times,
            FilterCategory::Formats => &self.formats,
            FilterCategory::Types => &self.types,
        }
    }
}

impl Meeting {
    pub fn has_tag(&self, category: FilterCategory, value: &str) -> bool {
        self.tags.get(category).iter().any(|t| t == value)
    }

    /// Case-insensitive substring match against name, location, address,
    /// notes and type names. `token` must already be lowercase.
    pub fn matches_token(&self, token: &str) -> bool {
        self.search_text.contains(token)
    }

    pub fn is_timed(&self) -> bool {
        self.day.is_some() && self.time.is_some()
    }

    pub fn day_name(&self) -> Option<&'static str> {
        self.day.map(day_name)
    }

    /// Length of the meeting, falling back to an hour.
    pub fn duration(&self) -> Duration {
        match (self.time, self.end_time) {
            (Some(start), Some(end)) if end > start => end - start,
            (Some(start), Some(end)) if end < start => end - start + Duration::days(1),
            _ => Duration::minutes(DEFAULT_DURATION_MINUTES),
        }
    }

    /// Next start at or after `after`, in the meeting's native timezone.
    ///
    /// None for untimed meetings and meetings without a known timezone.
    pub fn next_start(&self, after: DateTime<Utc>) -> Option<DateTime<Tz>> {
        let (day, time, tz) = (self.day?, self.time?, self.timezone?);

        let today = after.with_timezone(&tz).date_naive();
        let days_ahead = (day.num_days_from_sunday() + 7 - today.weekday().num_days_from_sunday()) % 7;

        for offset in [days_ahead as i64, days_ahead as i64 + 7] {
            let date = today + Duration::days(offset);
            let Some(start) = tz.from_local_datetime(&date.and_time(time)).earliest() else {
                // Skipped by a DST transition; try the following week.
                continue;
            };
            if start >= after.with_timezone(&tz) {
                return Some(start);
            }
        }

        None
    }

    /// Next start converted into `target`, for display in a chosen timezone.
    pub fn next_start_in(&self, target: Tz, after: DateTime<Utc>) -> Option<DateTime<Tz>> {
        self.next_start(after).map(|dt| dt.with_timezone(&target))
    }
}

pub fn day_name(day: Weekday) -> &'static str {
    DAY_NAMES[day.num_days_from_sunday() as usize]
}

/// Weekday for a catalog day index (0 = Sunday).
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Time-of-day buckets a start time falls into. Buckets overlap around noon.
pub fn time_buckets(time: NaiveTime) -> Vec<&'static str> {
    let hour = chrono::Timelike::hour(&time);
    let mut buckets = Vec::new();

    if (4..12).contains(&hour) {
        buckets.push(MORNING);
    }
    if (11..13).contains(&hour) {
        buckets.push(MIDDAY);
    }
    if (12..17).contains(&hour) {
        buckets.push(AFTERNOON);
    }
    if (17..21).contains(&hour) {
        buckets.push(EVENING);
    }
    if !(4..21).contains(&hour) {
        buckets.push(NIGHT);
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_json;
    use chrono_tz::America::New_York;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // --- time_buckets ---

    #[test]
    fn early_morning_is_night() {
        assert_eq!(time_buckets(time(3, 59)), vec![NIGHT]);
        assert_eq!(time_buckets(time(4, 0)), vec![MORNING]);
    }

    #[test]
    fn noon_hours_overlap() {
        assert_eq!(time_buckets(time(11, 30)), vec![MORNING, MIDDAY]);
        assert_eq!(time_buckets(time(12, 0)), vec![MIDDAY, AFTERNOON]);
        assert_eq!(time_buckets(time(13, 0)), vec![AFTERNOON]);
    }

    #[test]
    fn evening_and_night() {
        assert_eq!(time_buckets(time(19, 30)), vec![EVENING]);
        assert_eq!(time_buckets(time(21, 0)), vec![NIGHT]);
        assert_eq!(time_buckets(time(23, 59)), vec![NIGHT]);
    }

    // --- day helpers ---

    #[test]
    fn day_indexes_start_on_sunday() {
        assert_eq!(weekday_from_index(0), Some(Weekday::Sun));
        assert_eq!(weekday_from_index(6), Some(Weekday::Sat));
        assert_eq!(weekday_from_index(7), None);
        assert_eq!(day_name(Weekday::Wed), "Wednesday");
    }

    // --- next_start ---

    fn meeting(day: u8, time: &str) -> Meeting {
        let json = format!(
            r#"[{{"name": "Test", "day": {day}, "time": "{time}", "timezone": "America/New_York"}}]"#
        );
        load_json(&json, &Default::default()).unwrap().meetings.remove(0)
    }

    #[test]
    fn next_start_later_this_week() {
        // Monday 2026-03-16 12:00 UTC = 08:00 in New York
        let after = Utc.with_ymd_and_hms(2026, 3, 16, 12, 0, 0).unwrap();
        let start = meeting(3, "19:00").next_start(after).unwrap();
        assert_eq!(start, New_York.with_ymd_and_hms(2026, 3, 18, 19, 0, 0).unwrap());
    }

    #[test]
    fn next_start_rolls_to_next_week_when_already_started() {
        let after = Utc.with_ymd_and_hms(2026, 3, 16, 12, 0, 0).unwrap();
        let start = meeting(1, "07:00").next_start(after).unwrap();
        assert_eq!(start, New_York.with_ymd_and_hms(2026, 3, 23, 7, 0, 0).unwrap());
    }

    #[test]
    fn next_start_converted_to_other_zone() {
        let after = Utc.with_ymd_and_hms(2026, 3, 16, 12, 0, 0).unwrap();
        let start = meeting(3, "19:00")
            .next_start_in(chrono_tz::Europe::London, after)
            .unwrap();
        assert_eq!(start.format("%a %H:%M").to_string(), "Wed 23:00");
    }

    #[test]
    fn untimed_meeting_has_no_next_start() {
        let json = r#"[{"name": "By appointment", "timezone": "America/New_York"}]"#;
        let m = load_json(json, &Default::default()).unwrap().meetings.remove(0);
        assert!(m.next_start(Utc::now()).is_none());
        assert!(!m.is_timed());
    }

    // --- duration ---

    #[test]
    fn duration_from_end_time_or_default() {
        let mut m = meeting(1, "19:00");
        assert_eq!(m.duration(), Duration::minutes(60));
        m.end_time = Some(time(20, 30));
        assert_eq!(m.duration(), Duration::minutes(90));
        m.time = Some(time(23, 30));
        m.end_time = Some(time(0, 30));
        assert_eq!(m.duration(), Duration::minutes(60));
    }
}
