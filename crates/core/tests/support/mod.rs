//! Shared test helpers for `campuscal-core` integration tests.
//!
//! In-memory implementations of the core ports plus small fixture builders,
//! so pipeline tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod fetch;
pub mod repositories;

use std::sync::Mutex;

use campuscal_core::ScrapeDelegate;
use campuscal_domain::{CacheKey, CalendarEntry, CalendarSource, SourceFormat};
use chrono::{DateTime, TimeZone, Utc};

pub use fetch::{LineParser, MockFetcher};
pub use repositories::MockRecordRepository;

/// Entry starting at `hour`:00 UTC on a fixed day
pub fn entry(title: &str, hour: u32) -> CalendarEntry {
    CalendarEntry::builder(title, at(hour)).build().unwrap()
}

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 20, hour, 0, 0).unwrap()
}

/// Body understood by [`LineParser`] for the given entries
pub fn line_body(entries: &[CalendarEntry]) -> Vec<u8> {
    entries
        .iter()
        .map(|e| format!("{}|{}\n", e.title(), e.start().to_rfc3339()))
        .collect::<String>()
        .into_bytes()
}

pub fn source(key: &str) -> CalendarSource {
    CalendarSource::parse(
        CacheKey::new(key).unwrap(),
        &format!("https://calendar.example.edu/{key}"),
        SourceFormat::JsonFeed,
    )
    .unwrap()
}

/// Delegate that records every callback it receives
#[derive(Default)]
pub struct RecordingDelegate {
    pub finished: Mutex<Vec<Vec<CalendarEntry>>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingDelegate {
    pub fn callback_count(&self) -> usize {
        self.finished.lock().unwrap().len() + self.errors.lock().unwrap().len()
    }
}

impl ScrapeDelegate for RecordingDelegate {
    fn on_finish_scraping(&self, entries: Vec<CalendarEntry>) {
        self.finished.lock().unwrap().push(entries);
    }

    fn on_error(&self, description: String) {
        self.errors.lock().unwrap().push(description);
    }
}
