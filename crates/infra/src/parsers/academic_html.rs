//! Registrar-style HTML calendar pages
//!
//! Expected markup:
//!
//! ```html
//! <ul class="event-list">
//!   <li class="event">
//!     <h3 class="event-title">Fall Welcome</h3>
//!     <time class="event-start" datetime="2025-08-20T09:00:00-07:00"></time>
//!     <time class="event-end" datetime="2025-08-20T11:00:00-07:00"></time>
//!     <span class="event-location">Sproul Plaza</span>
//!     <p class="event-note">Open to all students</p>
//!     <a class="event-link" href="https://...">Details</a>
//!   </li>
//! </ul>
//! ```
//!
//! `datetime` values are RFC 3339 timestamps or `YYYY-MM-DD` all-day dates.

use campuscal_core::SourceParser;
use campuscal_domain::utils::parse_date_or_timestamp;
use campuscal_domain::{CalendarEntry, CampusCalError, Result, SourceFormat};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Parser for [`SourceFormat::AcademicHtml`]
#[derive(Debug, Default, Clone, Copy)]
pub struct AcademicHtmlParser;

struct Selectors {
    list: Selector,
    event: Selector,
    title: Selector,
    start: Selector,
    end: Selector,
    location: Selector,
    note: Selector,
    link: Selector,
}

impl Selectors {
    fn build() -> Result<Self> {
        Ok(Self {
            list: selector(".event-list")?,
            event: selector(".event")?,
            title: selector(".event-title")?,
            start: selector("time.event-start")?,
            end: selector("time.event-end")?,
            location: selector(".event-location")?,
            note: selector(".event-note")?,
            link: selector("a.event-link")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| CampusCalError::Internal(format!("invalid selector '{css}': {e}")))
}

impl SourceParser for AcademicHtmlParser {
    fn format(&self) -> SourceFormat {
        SourceFormat::AcademicHtml
    }

    fn parse(&self, body: &[u8]) -> Result<Vec<CalendarEntry>> {
        let selectors = Selectors::build()?;
        let document = Html::parse_document(&String::from_utf8_lossy(body));

        let list = document
            .select(&selectors.list)
            .next()
            .ok_or_else(|| CampusCalError::Parse("page has no .event-list container".into()))?;

        let entries = list
            .select(&selectors.event)
            .enumerate()
            .map(|(index, event)| parse_event(&selectors, event, index + 1))
            .collect::<Result<Vec<_>>>()?;

        debug!(entries = entries.len(), "Parsed academic calendar page");
        Ok(entries)
    }
}

fn parse_event(selectors: &Selectors, event: ElementRef<'_>, position: usize) -> Result<CalendarEntry> {
    let title = first_text(event, &selectors.title)
        .ok_or_else(|| CampusCalError::Parse(format!("event #{position} has no .event-title")))?;

    let start = event
        .select(&selectors.start)
        .next()
        .and_then(|el| el.value().attr("datetime"))
        .ok_or_else(|| {
            CampusCalError::Parse(format!("event #{position} ('{title}') has no time.event-start[datetime]"))
        })?;
    let start = parse_date_or_timestamp(start, "start")?;

    let mut builder = CalendarEntry::builder(title.as_str(), start);

    if let Some(end) = event.select(&selectors.end).next().and_then(|el| el.value().attr("datetime")) {
        builder = builder.end(parse_date_or_timestamp(end, "end")?);
    }
    if let Some(location) = first_text(event, &selectors.location) {
        builder = builder.location(location);
    }
    if let Some(note) = first_text(event, &selectors.note) {
        builder = builder.source_note(note);
    }
    if let Some(href) = event.select(&selectors.link).next().and_then(|el| el.value().attr("href")) {
        builder = builder.link(href);
    }

    builder.build().map_err(|e| CampusCalError::Parse(format!("event #{position}: {}", e.description())))
}

/// Whitespace-normalised text of the first match, if non-empty
fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = scope.select(selector).next()?;
    let text = element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}
