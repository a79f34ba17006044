//! Scrape orchestrator - staleness check, coalesced fetch and completion
//!
//! Phases per cache key:
//!
//! ```text
//! Idle -> Checking -> CacheHit
//!                  -> Fetching -> Succeeded | Failed
//! ```
//!
//! At most one fetch runs per cache key. A trigger that arrives while a key
//! is `Fetching` joins the running fetch and receives the same outcome, so
//! commits for one key never interleave.

use std::sync::Arc;

use campuscal_domain::{
    CacheKey, CalendarSource, CampusCalError, RescrapeDecision, Result, ScrapeOutcome, ScrapePhase,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::delegate::{CallbackDispatcher, ScrapeDelegate};
use super::engine::ScrapeEngine;
use crate::staleness::StalenessStore;

type InFlightScrape = Shared<BoxFuture<'static, ScrapeOutcome>>;

struct Inner {
    engine: Arc<ScrapeEngine>,
    store: Arc<StalenessStore>,
    phases: DashMap<CacheKey, ScrapePhase>,
    in_flight: DashMap<CacheKey, InFlightScrape>,
}

/// Coordinates the staleness store and the scrape engine.
///
/// Cheap to clone; clones share phase tracking and in-flight scrapes.
#[derive(Clone)]
pub struct ScrapeOrchestrator {
    inner: Arc<Inner>,
    dispatcher: Option<CallbackDispatcher>,
}

impl ScrapeOrchestrator {
    pub fn new(engine: Arc<ScrapeEngine>, store: Arc<StalenessStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                engine,
                store,
                phases: DashMap::new(),
                in_flight: DashMap::new(),
            }),
            dispatcher: None,
        }
    }

    /// Deliver [`request`](Self::request) completions through `dispatcher`
    pub fn with_dispatcher(mut self, dispatcher: CallbackDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn store(&self) -> &Arc<StalenessStore> {
        &self.inner.store
    }

    /// Current phase for `key`; `Idle` if it has never been touched
    pub fn phase(&self, key: &CacheKey) -> ScrapePhase {
        self.inner.phases.get(key).map(|p| *p).unwrap_or_default()
    }

    /// Whether a fetch for `key` is running
    pub fn is_fetching(&self, key: &CacheKey) -> bool {
        self.inner.in_flight.contains_key(key)
    }

    /// Ask the staleness store whether `source` needs scraping
    #[instrument(skip(self, source), fields(cache_key = %source.key))]
    pub async fn check(&self, source: &CalendarSource) -> RescrapeDecision {
        let fetching = self.is_fetching(&source.key);
        if !fetching {
            self.inner.set_phase(&source.key, ScrapePhase::Checking);
        }

        let decision = self.inner.store.should_rescrape(source.url.as_str(), &source.key).await;

        if !fetching && !self.is_fetching(&source.key) {
            let phase = if decision.should_rescrape { ScrapePhase::Idle } else { ScrapePhase::CacheHit };
            self.inner.set_phase(&source.key, phase);
        }
        decision
    }

    /// Fetch and parse `source` regardless of staleness.
    ///
    /// On success the entries are committed before the outcome is returned;
    /// on failure the stored record is left untouched. Joins the running
    /// scrape if one is already in flight for this key.
    pub async fn scrape(&self, source: &CalendarSource) -> ScrapeOutcome {
        self.join_or_start(source).await
    }

    /// Serve fresh cached entries, or scrape when they are stale or missing
    #[instrument(skip(self, source), fields(cache_key = %source.key))]
    pub async fn refresh(&self, source: &CalendarSource) -> ScrapeOutcome {
        let decision = self.check(source).await;
        if decision.should_rescrape {
            self.scrape(source).await
        } else {
            debug!(entries = decision.saved_events.len(), "Serving cached entries");
            ScrapeOutcome::Finished(decision.saved_events)
        }
    }

    /// Run [`refresh`](Self::refresh) in the background and deliver exactly
    /// one callback to `delegate` through the configured dispatcher.
    ///
    /// # Errors
    /// Returns `CampusCalError::Config` when no dispatcher is configured.
    pub fn request(
        &self,
        source: CalendarSource,
        delegate: Arc<dyn ScrapeDelegate>,
    ) -> Result<JoinHandle<()>> {
        let dispatcher = self
            .dispatcher
            .clone()
            .ok_or_else(|| CampusCalError::Config("no callback dispatcher configured".into()))?;
        let orchestrator = self.clone();

        Ok(tokio::spawn(async move {
            let outcome = orchestrator.refresh(&source).await;
            if let Err(err) = dispatcher.deliver(delegate, outcome) {
                warn!(cache_key = %source.key, error = %err, "Dropped scrape completion");
            }
        }))
    }

    /// Drop the stored record for `key` so the next refresh scrapes
    pub async fn invalidate(&self, key: &CacheKey) {
        self.inner.store.invalidate(key).await;
        if !self.is_fetching(key) {
            self.inner.set_phase(key, ScrapePhase::Idle);
        }
    }

    fn join_or_start(&self, source: &CalendarSource) -> InFlightScrape {
        let scrape = match self.inner.in_flight.entry(source.key.clone()) {
            Entry::Occupied(running) => {
                debug!(cache_key = %source.key, "Joining in-flight scrape");
                return running.get().clone();
            }
            Entry::Vacant(slot) => {
                let inner = Arc::clone(&self.inner);
                let owned = source.clone();
                let scrape = async move { inner.run_scrape(owned).await }.boxed().shared();

                self.inner.set_phase(&source.key, ScrapePhase::Fetching);
                slot.insert(scrape.clone());
                scrape
            }
        };

        // Driven to completion even if every caller stops awaiting
        tokio::spawn(scrape.clone());
        scrape
    }
}

impl Inner {
    fn set_phase(&self, key: &CacheKey, phase: ScrapePhase) {
        self.phases.insert(key.clone(), phase);
    }

    async fn run_scrape(self: Arc<Self>, source: CalendarSource) -> ScrapeOutcome {
        let outcome = match self.engine.scrape(&source).await {
            Ok(entries) => {
                self.store.commit(&source.key, source.url.as_str(), entries.clone()).await;
                info!(cache_key = %source.key, entries = entries.len(), "Scrape succeeded");
                self.set_phase(&source.key, ScrapePhase::Succeeded);
                ScrapeOutcome::Finished(entries)
            }
            Err(err) => {
                warn!(cache_key = %source.key, error = %err, "Scrape failed");
                self.set_phase(&source.key, ScrapePhase::Failed);
                ScrapeOutcome::from(err)
            }
        };

        self.in_flight.remove(&source.key);
        outcome
    }
}
