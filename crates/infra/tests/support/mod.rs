//! Shared helpers for `campuscal-infra` integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use campuscal_common::testing::TempDir;
use campuscal_common::time::MockClock;
use campuscal_core::{RecordRepository, ScrapeDelegate, ScrapeEngine, ScrapeOrchestrator, StalenessStore};
use campuscal_domain::{CacheKey, CalendarEntry, CalendarSource, SourceFormat};
use campuscal_infra::database::{DbManager, SqliteRecordRepository};
use campuscal_infra::http::{HttpCalendarFetcher, HttpClient};
use campuscal_infra::parsers::default_registry;

pub const ACADEMIC_PAGE: &str = include_str!("../fixtures/academic_calendar.html");
pub const MAINTENANCE_PAGE: &str = include_str!("../fixtures/missing_markers.html");
pub const CAMPUS_FEED: &str = include_str!("../fixtures/campus_events.ics");

/// Temporary database that lives as long as the test holds it.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new("campuscal-infra-test").expect("temp dir should be created");
        let path = temp_dir.path().join("campuscal.db");
        let manager = Arc::new(open(&path));

        Self { manager, path, _temp_dir: temp_dir }
    }

    /// Open a second, independent manager on the same file.
    pub fn reopen(&self) -> Arc<DbManager> {
        Arc::new(open(&self.path))
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

fn open(path: &std::path::Path) -> DbManager {
    let manager = DbManager::new(path, 4).expect("db manager should be created");
    manager.run_migrations().expect("migrations should run");
    manager
}

/// Orchestrator over the real SQLite, HTTP and parser adapters with a 24h TTL
pub fn pipeline(db: Arc<DbManager>, clock: &MockClock) -> ScrapeOrchestrator {
    let repository: Arc<dyn RecordRepository> = Arc::new(SqliteRecordRepository::new(db));
    let store =
        StalenessStore::new(repository, chrono::Duration::hours(24)).with_clock(Arc::new(clock.clone()));
    let client = HttpClient::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("http client should build");
    let engine = ScrapeEngine::new(Arc::new(HttpCalendarFetcher::new(client)), default_registry());

    ScrapeOrchestrator::new(Arc::new(engine), Arc::new(store))
}

pub fn source(server_uri: &str, path: &str, key: CacheKey, format: SourceFormat) -> CalendarSource {
    CalendarSource::parse(key, &format!("{server_uri}{path}"), format).expect("test source should be valid")
}

pub fn titles(entries: &[CalendarEntry]) -> Vec<&str> {
    entries.iter().map(CalendarEntry::title).collect()
}

/// Delegate that records every callback it receives.
#[derive(Default)]
pub struct RecordingDelegate {
    pub finished: Mutex<Vec<Vec<CalendarEntry>>>,
    pub errors: Mutex<Vec<String>>,
}

impl ScrapeDelegate for RecordingDelegate {
    fn on_finish_scraping(&self, entries: Vec<CalendarEntry>) {
        self.finished.lock().unwrap().push(entries);
    }

    fn on_error(&self, message: String) {
        self.errors.lock().unwrap().push(message);
    }
}
