//! iCalendar (RFC 5545) feeds

use campuscal_core::SourceParser;
use campuscal_domain::{CalendarEntry, CampusCalError, Result, SourceFormat};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::parser::{read_calendar, unfold, Component, Property};
use icalendar::{CalendarDateTime, DatePerhapsTime};
use tracing::debug;

/// Parser for [`SourceFormat::ICalendar`].
///
/// Every `VEVENT` needs `SUMMARY` and `DTSTART`. UTC, floating (read as UTC)
/// and `TZID` datetimes are accepted, as are all-day dates (midnight UTC).
#[derive(Debug, Default, Clone, Copy)]
pub struct IcsParser;

impl SourceParser for IcsParser {
    fn format(&self) -> SourceFormat {
        SourceFormat::ICalendar
    }

    fn parse(&self, body: &[u8]) -> Result<Vec<CalendarEntry>> {
        let text = String::from_utf8_lossy(body);
        let unfolded = unfold(&text);

        if !unfolded.lines().any(|line| line.trim().eq_ignore_ascii_case("BEGIN:VCALENDAR")) {
            return Err(CampusCalError::Parse("feed has no VCALENDAR".into()));
        }

        let calendar = read_calendar(&unfolded)
            .map_err(|e| CampusCalError::Parse(format!("malformed iCalendar feed: {e}")))?;

        let mut events = Vec::new();
        collect_events(&calendar.components, &mut events);

        let entries = events
            .into_iter()
            .enumerate()
            .map(|(index, event)| parse_event(event, index + 1))
            .collect::<Result<Vec<_>>>()?;

        debug!(entries = entries.len(), "Parsed iCalendar feed");
        Ok(entries)
    }
}

/// VEVENTs in document order, looking through a nested VCALENDAR wrapper
fn collect_events<'a, 'c>(components: &'a [Component<'c>], out: &mut Vec<&'a Component<'c>>) {
    for component in components {
        if component.name == "VEVENT" {
            out.push(component);
        } else if component.name == "VCALENDAR" {
            collect_events(&component.components, out);
        }
    }
}

fn parse_event(event: &Component<'_>, position: usize) -> Result<CalendarEntry> {
    let title = event
        .find_prop("SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()))
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| CampusCalError::Parse(format!("VEVENT #{position} has no SUMMARY")))?;

    let start = event
        .find_prop("DTSTART")
        .ok_or_else(|| CampusCalError::Parse(format!("VEVENT #{position} ('{title}') has no DTSTART")))?;
    let start = to_utc(start, "DTSTART", position)?;

    let mut builder = CalendarEntry::builder(title.as_str(), start);

    if let Some(end) = event.find_prop("DTEND") {
        builder = builder.end(to_utc(end, "DTEND", position)?);
    }
    if let Some(location) = event.find_prop("LOCATION") {
        builder = builder.location(unescape_text(location.val.as_ref()));
    }
    if let Some(description) = event.find_prop("DESCRIPTION") {
        builder = builder.source_note(unescape_text(description.val.as_ref()));
    }
    if let Some(url) = event.find_prop("URL") {
        builder = builder.link(url.val.as_ref());
    }

    builder.build().map_err(|e| CampusCalError::Parse(format!("VEVENT #{position}: {}", e.description())))
}

fn to_utc(prop: &Property<'_>, field: &str, position: usize) -> Result<DateTime<Utc>> {
    let value = DatePerhapsTime::try_from(prop).map_err(|_| {
        CampusCalError::Parse(format!(
            "VEVENT #{position} has invalid {field} '{}'",
            prop.val.as_ref()
        ))
    })?;

    match value {
        DatePerhapsTime::Date(date) => date
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .ok_or_else(|| CampusCalError::Parse(format!("VEVENT #{position} has invalid {field} date"))),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => Ok(dt),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => Ok(naive.and_utc()),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            zoned_to_utc(date_time, &tzid).ok_or_else(|| {
                CampusCalError::Parse(format!("VEVENT #{position} has {field} in unknown time zone '{tzid}'"))
            })
        }
    }
}

/// Resolve a local time in `tzid`; a time skipped by a DST jump has no
/// mapping and yields `None`, an ambiguous one takes the earlier instant.
fn zoned_to_utc(local: NaiveDateTime, tzid: &str) -> Option<DateTime<Utc>> {
    let tz: Tz = tzid.trim_matches('"').parse().ok()?;
    tz.from_local_datetime(&local).earliest().map(|dt| dt.with_timezone(&Utc))
}

/// Undo RFC 5545 TEXT escaping
fn unescape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
