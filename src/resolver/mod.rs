//! Redirect resolution
//!
//! Turns a short code into a browser navigation:
//!
//! ```text
//! Initial ──(code available)──→ Loading ──(delay, 1 lookup)──┬→ Navigating(url)
//!                                                            └→ Error
//! ```
//!
//! The lookup runs as a task owned by [`ScheduledLookup`]. Dropping the handle
//! aborts the task, so a torn-down view never navigates or changes state.
//! Every failure (transport, non-2xx, empty destination) collapses into
//! [`ResolveOutcome::NotFound`]; the cause is only logged.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::client::LinkApi;

/// View state of one redirect page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverState {
    Initial,
    Loading,
    Navigating(String),
    Error,
}

impl ResolverState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResolverState::Navigating(_) | ResolverState::Error)
    }
}

/// Result of a single lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Full navigation target, already normalized
    Navigate(String),
    NotFound,
}

impl From<ResolveOutcome> for ResolverState {
    fn from(outcome: ResolveOutcome) -> Self {
        match outcome {
            ResolveOutcome::Navigate(url) => ResolverState::Navigating(url),
            ResolveOutcome::NotFound => ResolverState::Error,
        }
    }
}

/// Prefix `https://` unless the destination already starts with `http://` or `https://`.
pub fn normalize_destination(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

#[derive(Clone)]
pub struct RedirectResolver {
    api: Arc<dyn LinkApi>,
    delay: Duration,
}

impl RedirectResolver {
    pub fn new(api: Arc<dyn LinkApi>, delay: Duration) -> Self {
        Self { api, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// One lookup against the API, no pacing.
    pub async fn lookup(&self, short_code: &str) -> ResolveOutcome {
        match self.api.lookup(short_code).await {
            Ok(Some(destination)) => {
                let target = normalize_destination(&destination);
                trace!("Short code {} resolved to {}", short_code, target);
                ResolveOutcome::Navigate(target)
            }
            Ok(None) => {
                debug!("Lookup for {} returned no destination", short_code);
                ResolveOutcome::NotFound
            }
            Err(e) if e.status() == Some(404) => {
                debug!("Short code not found: {}", short_code);
                ResolveOutcome::NotFound
            }
            Err(e) => {
                warn!("Lookup for {} failed: {}", short_code, e);
                ResolveOutcome::NotFound
            }
        }
    }

    /// Wait out the pacing delay, then look the code up once.
    pub async fn resolve(&self, short_code: &str) -> ResolveOutcome {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.lookup(short_code).await
    }

    /// Start the paced lookup for `short_code` as a task owned by the returned handle.
    ///
    /// An empty code starts nothing and the handle stays in `Initial`.
    pub fn schedule(&self, short_code: &str) -> ScheduledLookup {
        if short_code.is_empty() {
            let (_tx, state) = watch::channel(ResolverState::Initial);
            return ScheduledLookup {
                short_code: String::new(),
                state,
                handle: None,
            };
        }

        let (tx, state) = watch::channel(ResolverState::Loading);
        let resolver = self.clone();
        let code = short_code.to_string();

        let handle = tokio::spawn(async move {
            let outcome = resolver.resolve(&code).await;
            tx.send_replace(ResolverState::from(outcome.clone()));
            outcome
        });

        ScheduledLookup {
            short_code: short_code.to_string(),
            state,
            handle: Some(handle),
        }
    }
}

/// Handle to a pending redirect lookup, tied to the lifetime of one view.
///
/// Dropping it aborts the lookup task.
pub struct ScheduledLookup {
    short_code: String,
    state: watch::Receiver<ResolverState>,
    handle: Option<JoinHandle<ResolveOutcome>>,
}

impl ScheduledLookup {
    pub fn short_code(&self) -> &str {
        &self.short_code
    }

    /// Current state snapshot
    pub fn state(&self) -> ResolverState {
        self.state.borrow().clone()
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<ResolverState> {
        self.state.clone()
    }

    /// Wait for the lookup to finish.
    ///
    /// Yields the outcome at most once; later calls, cancelled lookups and
    /// lookups that never started return `None`.
    pub async fn outcome(&mut self) -> Option<ResolveOutcome> {
        // 只借用 handle：调用方的 future 被丢弃时，任务仍由 self 持有并在 Drop 中 abort
        let handle = self.handle.as_mut()?;
        let result = handle.await;
        self.handle = None;

        match result {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                if !e.is_cancelled() {
                    warn!("Redirect lookup task for {} failed: {}", self.short_code, e);
                }
                None
            }
        }
    }

    /// Abort the pending lookup. No-op once it finished.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            trace!("Cancelling redirect lookup for {}", self.short_code);
            handle.abort();
        }
    }
}

impl Drop for ScheduledLookup {
    fn drop(&mut self) {
        self.cancel();
    }
}
