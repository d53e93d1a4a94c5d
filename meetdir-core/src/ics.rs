//! ICS export of a meeting as a weekly recurring event.

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, EventLike, Property};

use crate::error::{MeetDirError, MeetDirResult};
use crate::meeting::Meeting;

/// Namespace for deterministic event UIDs derived from meeting ids.
const UID_NAMESPACE: uuid::Uuid = uuid::Uuid::from_u128(0x6d65_6574_6469_7200_8000_0000_0000_0001);

/// Generate .ics content for a meeting, starting at its next occurrence after `after`.
pub fn generate_ics(meeting: &Meeting, after: DateTime<Utc>) -> MeetDirResult<String> {
    let start = meeting.next_start(after).ok_or_else(|| {
        MeetDirError::IcsGenerate(format!(
            "'{}' has no regular day, time and timezone",
            meeting.name
        ))
    })?;
    let end = start + meeting.duration();
    let tzid = start.timezone().name();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event_uid(meeting));
    ics_event.summary(&meeting.name);
    ics_event.add_property("DTSTAMP", after.format("%Y%m%dT%H%M%SZ").to_string());

    let mut dtstart = Property::new("DTSTART", start.format("%Y%m%dT%H%M%S").to_string());
    dtstart.add_parameter("TZID", tzid);
    ics_event.append_property(dtstart);

    let mut dtend = Property::new("DTEND", end.format("%Y%m%dT%H%M%S").to_string());
    dtend.add_parameter("TZID", tzid);
    ics_event.append_property(dtend);

    let byday = match start.format("%a").to_string().as_str() {
        "Sun" => "SU",
        "Mon" => "MO",
        "Tue" => "TU",
        "Wed" => "WE",
        "Thu" => "TH",
        "Fri" => "FR",
        _ => "SA",
    };
    ics_event.add_property("RRULE", format!("FREQ=WEEKLY;BYDAY={}", byday));

    let location = match (&meeting.location, &meeting.address) {
        (Some(loc), Some(addr)) => Some(format!("{}, {}", loc, addr)),
        (Some(loc), None) => Some(loc.clone()),
        (None, Some(addr)) => Some(addr.clone()),
        (None, None) => None,
    };
    if let Some(ref loc) = location {
        ics_event.location(loc);
    }

    let description = [meeting.notes.clone(), meeting.conference_phone.clone()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n");
    if !description.is_empty() {
        ics_event.description(&description);
    }

    if let Some(ref url) = meeting.conference_url {
        ics_event.add_property("URL", url);
    }

    let mut cal = Calendar::new();
    cal.push(ics_event.done());
    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

fn event_uid(meeting: &Meeting) -> String {
    let id = uuid::Uuid::new_v5(&UID_NAMESPACE, meeting.id.as_bytes());
    format!("{}@meetdir", id)
}

/// Replace the icalendar crate's PRODID and drop the default CALSCALE.
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:MEETDIR\r\n");
            continue;
        }
        if line == "CALSCALE:GREGORIAN" {
            continue;
        }
        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
