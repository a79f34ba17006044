//! Pipeline context - wires the concrete adapters into the core services

use std::sync::Arc;

use campuscal_core::{CallbackDispatcher, RecordRepository, ScrapeEngine, ScrapeOrchestrator, StalenessStore};
use campuscal_domain::{CacheKey, CalendarSource, Config, Result};
use tracing::info;

use crate::database::{DbManager, SqliteRecordRepository};
use crate::http::HttpCalendarFetcher;
use crate::parsers::default_registry;

/// Holds the configured sources and the orchestrator built for them
pub struct CampusCalContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub orchestrator: ScrapeOrchestrator,
    sources: Vec<CalendarSource>,
}

impl CampusCalContext {
    /// Validate `config`, open the database and build the pipeline.
    ///
    /// # Errors
    /// Returns `CampusCalError::Config` for invalid configuration and
    /// `CampusCalError::Storage` when the database cannot be opened.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let sources = config.sources.iter().map(|s| s.to_source()).collect::<Result<Vec<_>>>()?;

        let db = Arc::new(DbManager::open(&config.database)?);
        let repository: Arc<dyn RecordRepository> = Arc::new(SqliteRecordRepository::new(Arc::clone(&db)));
        let store = Arc::new(StalenessStore::new(repository, config.scrape.ttl()));

        let fetcher = Arc::new(HttpCalendarFetcher::from_config(&config.scrape)?);
        let engine = Arc::new(ScrapeEngine::new(fetcher, default_registry()));

        info!(
            db_path = %db.path().display(),
            sources = sources.len(),
            "CampusCal pipeline initialised"
        );

        Ok(Self { config, db, orchestrator: ScrapeOrchestrator::new(engine, store), sources })
    }

    /// Route delegate callbacks through `dispatcher`.
    pub fn with_dispatcher(mut self, dispatcher: CallbackDispatcher) -> Self {
        self.orchestrator = self.orchestrator.with_dispatcher(dispatcher);
        self
    }

    pub fn sources(&self) -> &[CalendarSource] {
        &self.sources
    }

    pub fn source(&self, key: &CacheKey) -> Option<&CalendarSource> {
        self.sources.iter().find(|s| &s.key == key)
    }
}
