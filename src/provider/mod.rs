//! This module keeps the local document loosely consistent with a remote copy
//!
//! The reconciliation rule is last-write-wins at whole-document granularity: a single
//! fetch decides the direction. If the remote `updatedAt` is larger, the remote
//! document replaces the local one wholesale; otherwise the full local document is
//! pushed. Nothing is ever merged field-by-field, and the losing side's concurrent
//! edits are discarded in full. That trade-off is deliberate: one user mirroring one
//! data set across devices, not multi-user collaboration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::document::Document;
use crate::error::Result;
use crate::store::Store;
use crate::traits::RemoteSource;

pub mod sync_progress;
use sync_progress::SyncProgress;
use sync_progress::{FeedbackSender, SyncEvent};

/// What a sync run did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No endpoint is configured; nothing was exchanged
    NotConfigured,
    /// The remote copy was newer and replaced the local document
    PulledRemote,
    /// The local copy was at least as recent and was pushed to the remote
    PushedLocal,
    /// Another sync was already in flight; this trigger was dropped
    Busy,
    /// The exchange failed; the local document is untouched
    Failed,
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncOutcome::NotConfigured => write!(f, "Not connected"),
            SyncOutcome::PulledRemote => write!(f, "Synced from cloud"),
            SyncOutcome::PushedLocal => write!(f, "Synced to cloud"),
            SyncOutcome::Busy => write!(f, "Sync already in progress"),
            SyncOutcome::Failed => write!(f, "Sync failed. Check your URL."),
        }
    }
}

/// Owns the document, its store, and (optionally) a remote copy of it.
///
/// All mutations go through [`Self::document_mut`] followed by [`Self::commit`]; the
/// provider persists the result and [`Self::sync`] reconciles it with the remote end.
/// Usually you will want a [`SyncScheduler`](crate::scheduler::SyncScheduler) on top,
/// so that syncs follow mutations automatically.
pub struct Provider<R: RemoteSource> {
    remote: Option<R>,
    store: Store,
    document: Document,

    /// The Syncing state of the engine. Shared with an RAII guard so a sync future
    /// that gets dropped mid-flight still releases it.
    syncing: Arc<AtomicBool>,
}

/// Clears the Syncing flag when the sync future completes or is dropped
struct InFlight(Arc<AtomicBool>);
impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<R: RemoteSource> Provider<R> {
    /// Create a provider, loading the last saved document from `store`.
    ///
    /// `remote` is usually a [`Client`](crate::client::Client); pass `None` when no
    /// endpoint is configured. Tests usually pass a
    /// [`MockRemote`](crate::mock_remote::MockRemote).
    pub fn new(store: Store, remote: Option<R>) -> Self {
        let document = store.load();
        Self {
            remote,
            store,
            document,
            syncing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The document, for mutation. Call [`Self::commit`] once done.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn is_connected(&self) -> bool {
        self.remote.is_some()
    }

    /// The remote source, if one is configured.
    ///
    /// Apart from tests and diagnostics, there are few reasons to access it directly.
    pub fn remote(&self) -> Option<&R> {
        self.remote.as_ref()
    }

    /// Attach an endpoint (or detach it with `None`). Takes effect on the next sync.
    pub fn set_remote(&mut self, remote: Option<R>) {
        self.remote = remote;
    }

    /// Persist the document after a mutation. This stamps `updatedAt`.
    pub fn commit(&mut self) -> Result<()> {
        self.store.save(&mut self.document)
    }

    /// Replace the document wholesale and persist it. This is the import path; the
    /// replacement counts as a local edit, so it wins the next sync exchange.
    pub fn replace_document(&mut self, mut document: Document) -> Result<()> {
        document.normalize();
        self.document = document;
        self.commit()
    }

    /// Performs one sync exchange, reporting progress events on `feedback_sender`.
    ///
    /// See [`Self::sync`].
    pub async fn sync_with_feedback(&mut self, feedback_sender: FeedbackSender) -> SyncOutcome {
        let mut progress = SyncProgress::new_with_feedback_channel(feedback_sender);
        self.run_sync(&mut progress).await
    }

    /// Performs one sync exchange: a single fetch, then either adopting the remote
    /// document or pushing the local one.
    ///
    /// Failures are reported through the returned outcome (and the feedback channel,
    /// if any), never as an error: local state stays untouched and the engine returns
    /// to idle, usable for the next attempt.
    pub async fn sync(&mut self) -> SyncOutcome {
        let mut progress = SyncProgress::new();
        self.run_sync(&mut progress).await
    }

    async fn run_sync(&mut self, progress: &mut SyncProgress) -> SyncOutcome {
        if self.remote.is_none() {
            progress.debug("No endpoint is configured, nothing to sync");
            progress.feedback(SyncEvent::Finished { outcome: SyncOutcome::NotConfigured });
            return SyncOutcome::NotConfigured;
        }

        if self.syncing.swap(true, Ordering::SeqCst) {
            // Not an error: the in-flight exchange or the next trigger covers us
            progress.debug("A sync is already in flight, dropping this trigger");
            return SyncOutcome::Busy;
        }
        let _in_flight = InFlight(self.syncing.clone());

        progress.feedback(SyncEvent::Started);
        let outcome = match self.run_sync_inner(progress).await {
            Ok(outcome) => outcome,
            Err(err) => {
                progress.error(&format!("Sync failed: {}", err));
                SyncOutcome::Failed
            }
        };
        progress.feedback(SyncEvent::Finished { outcome });
        outcome
    }

    async fn run_sync_inner(&mut self, progress: &mut SyncProgress) -> Result<SyncOutcome> {
        let remote_document = match &self.remote {
            None => return Ok(SyncOutcome::NotConfigured),
            Some(remote) => remote.fetch_document().await?,
        };

        progress.debug(&format!(
            "Remote updatedAt is {}, local is {}",
            remote_document.updated_at(),
            self.document.updated_at()
        ));

        if remote_document.updated_at() > self.document.updated_at() {
            progress.info("The cloud copy is newer, adopting it");
            self.store.save_replica(&remote_document)?;
            self.document = remote_document;
            return Ok(SyncOutcome::PulledRemote);
        }

        // The local copy is at least as recent; ties go to the local side
        progress.info("The local copy is current, pushing it to the cloud");
        if let Some(remote) = &self.remote {
            remote.push_document(&self.document).await?;
        }
        Ok(SyncOutcome::PushedLocal)
    }
}
