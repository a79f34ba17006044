//! Calendar entry produced by the source parsers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CampusCalError, Result};

/// One scraped event.
///
/// Entries are immutable once built: fields are private and only readable
/// through accessors. Construct with [`CalendarEntry::builder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    title: String,
    start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link: Option<String>,
}

impl CalendarEntry {
    /// Start building an entry with its two required fields
    pub fn builder(title: impl Into<String>, start: DateTime<Utc>) -> CalendarEntryBuilder {
        CalendarEntryBuilder {
            title: title.into(),
            start,
            end: None,
            location: None,
            source_note: None,
            link: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn source_note(&self) -> Option<&str> {
        self.source_note.as_deref()
    }

    /// Detail page for the event, when the source provides one
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }
}

/// Builder for [`CalendarEntry`]
#[derive(Debug, Clone)]
pub struct CalendarEntryBuilder {
    title: String,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    location: Option<String>,
    source_note: Option<String>,
    link: Option<String>,
}

impl CalendarEntryBuilder {
    pub fn end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = non_blank(location.into());
        self
    }

    pub fn source_note(mut self, note: impl Into<String>) -> Self {
        self.source_note = non_blank(note.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = non_blank(link.into());
        self
    }

    /// Validate and build the entry.
    ///
    /// # Errors
    /// Returns `CampusCalError::InvalidInput` when the title is blank or the
    /// end precedes the start.
    pub fn build(self) -> Result<CalendarEntry> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(CampusCalError::InvalidInput("calendar entry title is empty".into()));
        }

        if let Some(end) = self.end {
            if end < self.start {
                return Err(CampusCalError::InvalidInput(format!(
                    "calendar entry '{title}' ends before it starts"
                )));
            }
        }

        Ok(CalendarEntry {
            title,
            start: self.start,
            end: self.end,
            location: self.location,
            source_note: self.source_note,
            link: self.link,
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
