//! An in-memory remote endpoint, for tests and demos
//!
//! This stands in for a real [`Client`](crate::client::Client) wherever a server would
//! be inconvenient. Failures can be scripted, so tests can exercise the failure paths
//! of the sync engine.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::traits::RemoteSource;

/// A [`RemoteSource`] that keeps its document in memory.
///
/// A brand new mock behaves like a fresh endpoint: fetching yields the default
/// document (`updatedAt = 0`), so the first sync against it is a push.
#[derive(Default)]
pub struct MockRemote {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    document: Option<Document>,
    fetches_to_fail: u32,
    pushes_to_fail: u32,
    push_count: u32,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that already holds a document, as if another device had pushed it
    pub fn holding(document: Document) -> Self {
        Self {
            state: Mutex::new(MockState {
                document: Some(document),
                ..MockState::default()
            }),
        }
    }

    /// The current remote copy, if any device pushed one yet
    pub async fn document(&self) -> Option<Document> {
        self.state.lock().await.document.clone()
    }

    /// Make the next `count` fetches fail
    pub async fn fail_next_fetches(&self, count: u32) {
        self.state.lock().await.fetches_to_fail = count;
    }

    /// Make the next `count` pushes fail
    pub async fn fail_next_pushes(&self, count: u32) {
        self.state.lock().await.pushes_to_fail = count;
    }

    /// How many pushes reached this endpoint, failed ones included
    pub async fn push_count(&self) -> u32 {
        self.state.lock().await.push_count
    }
}

#[async_trait]
impl RemoteSource for MockRemote {
    async fn fetch_document(&self) -> Result<Document> {
        let mut state = self.state.lock().await;
        if state.fetches_to_fail > 0 {
            state.fetches_to_fail -= 1;
            return Err(Error::SyncTransport("mocked fetch failure".to_string()));
        }
        match &state.document {
            None => Ok(Document::default()),
            Some(document) => Ok(document.clone()),
        }
    }

    async fn push_document(&self, document: &Document) -> Result<()> {
        let mut state = self.state.lock().await;
        state.push_count += 1;
        if state.pushes_to_fail > 0 {
            state.pushes_to_fail -= 1;
            return Err(Error::SyncTransport("mocked push failure".to_string()));
        }
        state.document = Some(document.clone());
        Ok(())
    }
}
