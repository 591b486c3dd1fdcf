//! Utilities to track the progression of a sync

use std::fmt::{Display, Error, Formatter};

use crate::provider::SyncOutcome;

/// An event that happens during a sync.
///
/// Its `Display` form is ready for a status line: "Syncing...", "Synced to cloud",
/// "Sync failed. Check your URL.", and so on.
#[derive(Clone, Debug)]
pub enum SyncEvent {
    /// No sync has run yet
    NotStarted,
    /// A sync has just started
    Started,
    /// The sync is finished, one way or the other
    Finished { outcome: SyncOutcome },
}

impl Display for SyncEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            SyncEvent::NotStarted => write!(f, "Not started"),
            SyncEvent::Started => write!(f, "Syncing..."),
            SyncEvent::Finished { outcome } => write!(f, "{}", outcome),
        }
    }
}

impl Default for SyncEvent {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<SyncEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<SyncEvent>;

/// Create a feedback channel, that can be used to retrieve the current progress of a
/// sync operation (e.g. to drive a status line)
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(SyncEvent::default())
}

/// Logs what a sync does, and forwards events to the listener (if any)
pub struct SyncProgress {
    feedback_channel: Option<FeedbackSender>,
}

impl SyncProgress {
    pub fn new() -> Self {
        Self { feedback_channel: None }
    }

    pub fn new_with_feedback_channel(channel: FeedbackSender) -> Self {
        Self { feedback_channel: Some(channel) }
    }

    pub fn error(&mut self, text: &str) {
        log::error!("{}", text);
    }

    pub fn info(&mut self, text: &str) {
        log::info!("{}", text);
    }

    pub fn debug(&mut self, text: &str) {
        log::debug!("{}", text);
    }

    /// Send an event as a feedback to the listener (if any).
    pub fn feedback(&mut self, event: SyncEvent) {
        self.feedback_channel.as_ref().map(|sender| sender.send(event));
    }
}

impl Default for SyncProgress {
    fn default() -> Self {
        Self::new()
    }
}
