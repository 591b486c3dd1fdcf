//! Sync triggers around a shared [`Provider`]
//!
//! Three things start a sync:
//! * a debounced trigger after every local mutation (rapid edits within the window
//!   coalesce into a single network exchange),
//! * a fixed-interval background trigger,
//! * an explicit user request ([`SyncScheduler::sync_now`]).
//!
//! All of them go through one `Mutex` around the provider, so exchanges are
//! serialized: a trigger arriving while a sync is in flight waits its turn instead of
//! launching a second concurrent exchange.

use std::sync::Arc;
use std::time::Duration;

use tokio::select;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::provider::{Provider, SyncOutcome};
use crate::traits::RemoteSource;

/// How long after the last local mutation the debounced sync fires
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(1200);

/// How often the background sync runs
pub const BACKGROUND_SYNC_PERIOD: Duration = Duration::from_secs(30);

/// A provider as shared between the presentation layer and the sync tasks
pub type SharedProvider<R> = Arc<Mutex<Provider<R>>>;

/// Runs the debounce and background sync tasks around a shared [`Provider`].
///
/// Dropping the scheduler (or calling [`Self::shutdown`]) aborts both tasks; no timer
/// outlives it.
pub struct SyncScheduler<R: RemoteSource + Send + Sync + 'static> {
    provider: SharedProvider<R>,
    nudges: mpsc::UnboundedSender<()>,
    debounce_task: JoinHandle<()>,
    background_task: JoinHandle<()>,
}

impl<R: RemoteSource + Send + Sync + 'static> SyncScheduler<R> {
    /// Spawns the sync tasks. The background sync runs immediately, then every
    /// [`BACKGROUND_SYNC_PERIOD`].
    ///
    /// This must be called within a tokio runtime.
    pub fn new(provider: SharedProvider<R>) -> Self {
        let (nudges, mut receiver) = mpsc::unbounded_channel::<()>();

        let debounced = provider.clone();
        let debounce_task = tokio::spawn(async move {
            while receiver.recv().await.is_some() {
                // Every further nudge restarts the countdown
                loop {
                    select! {
                        _ = tokio::time::sleep(DEBOUNCE_DELAY) => break,
                        nudge = receiver.recv() => {
                            if nudge.is_none() {
                                return;
                            }
                        }
                    }
                }
                let outcome = debounced.lock().await.sync().await;
                log::debug!("Debounced sync finished: {:?}", outcome);
            }
        });

        let background = provider.clone();
        let background_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(BACKGROUND_SYNC_PERIOD);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let outcome = background.lock().await.sync().await;
                log::trace!("Background sync finished: {:?}", outcome);
            }
        });

        Self {
            provider,
            nudges,
            debounce_task,
            background_task,
        }
    }

    pub fn provider(&self) -> &SharedProvider<R> {
        &self.provider
    }

    /// Signal that a local mutation happened, (re)starting the debounce countdown
    pub fn nudge(&self) {
        // The only send error is a closed channel, i.e. we are shutting down
        let _ = self.nudges.send(());
    }

    /// Run a sync right now (the user-requested trigger) and return its outcome
    pub async fn sync_now(&self) -> SyncOutcome {
        self.provider.lock().await.sync().await
    }

    /// Tear the sync tasks down. Dropping the scheduler does the same.
    pub fn shutdown(self) {
        self.debounce_task.abort();
        self.background_task.abort();
    }
}

impl<R: RemoteSource + Send + Sync + 'static> Drop for SyncScheduler<R> {
    fn drop(&mut self) {
        self.debounce_task.abort();
        self.background_task.abort();
    }
}
