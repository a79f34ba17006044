//! Per-call completion delivery
//!
//! Each request carries its own [`ScrapeDelegate`]. Completions are queued on
//! a [`CallbackDispatcher`] and invoked one at a time by a single
//! [`CallbackLoop`], which stands in for the UI's main context.

use std::fmt;
use std::sync::Arc;

use campuscal_domain::{CalendarEntry, CampusCalError, Result, ScrapeOutcome};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Receives the result of one scrape request
pub trait ScrapeDelegate: Send + Sync {
    fn on_finish_scraping(&self, entries: Vec<CalendarEntry>);

    /// `description` is suitable for direct display
    fn on_error(&self, description: String);
}

struct Completion {
    delegate: Arc<dyn ScrapeDelegate>,
    outcome: ScrapeOutcome,
}

impl Completion {
    fn invoke(self) {
        match self.outcome {
            ScrapeOutcome::Finished(entries) => self.delegate.on_finish_scraping(entries),
            ScrapeOutcome::Failed(description) => self.delegate.on_error(description),
        }
    }
}

/// Sending half: hands completions to the callback loop
#[derive(Clone)]
pub struct CallbackDispatcher {
    tx: mpsc::UnboundedSender<Completion>,
}

/// Receiving half: invokes queued completions in arrival order
pub struct CallbackLoop {
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl CallbackDispatcher {
    /// Create a dispatcher and the loop that must be driven on the caller's
    /// designated context
    pub fn channel() -> (Self, CallbackLoop) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, CallbackLoop { rx })
    }

    /// Create a dispatcher whose loop runs as a tokio task
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (dispatcher, callback_loop) = Self::channel();
        let handle = tokio::spawn(callback_loop.run());
        (dispatcher, handle)
    }

    /// Queue `outcome` for delivery to `delegate`.
    ///
    /// # Errors
    /// Returns `CampusCalError::Internal` if the callback loop has stopped.
    pub fn deliver(&self, delegate: Arc<dyn ScrapeDelegate>, outcome: ScrapeOutcome) -> Result<()> {
        self.tx
            .send(Completion { delegate, outcome })
            .map_err(|_| CampusCalError::Internal("callback loop has stopped".into()))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl fmt::Debug for CallbackDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackDispatcher").field("closed", &self.is_closed()).finish()
    }
}

impl CallbackLoop {
    /// Invoke completions until every dispatcher has been dropped
    pub async fn run(mut self) {
        while let Some(completion) = self.rx.recv().await {
            completion.invoke();
        }
        debug!("Callback loop finished");
    }

    /// Invoke whatever is queued right now without waiting; returns how many
    /// completions ran. Suitable for a host run loop tick.
    pub fn drain_pending(&mut self) -> usize {
        let mut delivered = 0;
        loop {
            match self.rx.try_recv() {
                Ok(completion) => {
                    completion.invoke();
                    delivered += 1;
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if delivered == 0 {
                        warn!("Callback loop drained after all dispatchers closed");
                    }
                    break;
                }
            }
        }
        delivered
    }
}
