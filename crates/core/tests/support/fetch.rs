//! Scripted fetcher and a trivial line-based parser

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use campuscal_core::{CalendarFetcher, SourceParser};
use campuscal_domain::utils::parse_event_timestamp;
use campuscal_domain::{CalendarEntry, CampusCalError, Result as DomainResult, SourceFormat};
use url::Url;

/// Returns the configured response for every fetch and counts calls
#[derive(Clone)]
pub struct MockFetcher {
    response: Arc<Mutex<DomainResult<Vec<u8>>>>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockFetcher {
    pub fn new(body: Vec<u8>) -> Self {
        Self { response: Arc::new(Mutex::new(Ok(body))), delay: None, calls: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn failing(err: CampusCalError) -> Self {
        let fetcher = Self::new(Vec::new());
        fetcher.set_response(Err(err));
        fetcher
    }

    /// Hold every fetch open for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_response(&self, response: DomainResult<Vec<u8>>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarFetcher for MockFetcher {
    async fn fetch(&self, _url: &Url) -> DomainResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.lock().unwrap().clone()
    }
}

/// Parses `title|rfc3339-start` lines, registered as the JSON feed format
pub struct LineParser;

impl SourceParser for LineParser {
    fn format(&self) -> SourceFormat {
        SourceFormat::JsonFeed
    }

    fn parse(&self, body: &[u8]) -> DomainResult<Vec<CalendarEntry>> {
        let text = std::str::from_utf8(body).map_err(|e| CampusCalError::Parse(e.to_string()))?;
        if text.trim().is_empty() {
            return Err(CampusCalError::Parse("empty calendar body".into()));
        }

        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let (title, start) = line
                    .split_once('|')
                    .ok_or_else(|| CampusCalError::Parse(format!("malformed line '{line}'")))?;
                CalendarEntry::builder(title, parse_event_timestamp(start, "start")?).build()
            })
            .collect()
    }
}
