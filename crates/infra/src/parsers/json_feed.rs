//! JSON event feeds: `{"events": [{"title", "start", "end"?, "location"?, "note"?, "url"?}]}`

use campuscal_core::SourceParser;
use campuscal_domain::utils::parse_date_or_timestamp;
use campuscal_domain::{CalendarEntry, CampusCalError, Result, SourceFormat};
use serde::Deserialize;

use crate::errors::{json_error, JsonContext};

#[derive(Debug, Deserialize)]
struct Feed {
    events: Vec<FeedEvent>,
}

#[derive(Debug, Deserialize)]
struct FeedEvent {
    title: String,
    start: String,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Parser for [`SourceFormat::JsonFeed`]
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFeedParser;

impl SourceParser for JsonFeedParser {
    fn format(&self) -> SourceFormat {
        SourceFormat::JsonFeed
    }

    fn parse(&self, body: &[u8]) -> Result<Vec<CalendarEntry>> {
        let feed: Feed = serde_json::from_slice(body).map_err(|e| json_error(&e, JsonContext::Feed))?;

        feed.events
            .into_iter()
            .enumerate()
            .map(|(index, event)| to_entry(event, index + 1))
            .collect()
    }
}

fn to_entry(event: FeedEvent, position: usize) -> Result<CalendarEntry> {
    let mut builder = CalendarEntry::builder(event.title, parse_date_or_timestamp(&event.start, "start")?);

    if let Some(end) = event.end.as_deref() {
        builder = builder.end(parse_date_or_timestamp(end, "end")?);
    }
    if let Some(location) = event.location {
        builder = builder.location(location);
    }
    if let Some(note) = event.note {
        builder = builder.source_note(note);
    }
    if let Some(url) = event.url {
        builder = builder.link(url);
    }

    builder.build().map_err(|e| CampusCalError::Parse(format!("event #{position}: {}", e.description())))
}
