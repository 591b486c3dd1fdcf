use async_trait::async_trait;

use crate::document::Document;
use crate::error::Result;

/// One remote copy of the document.
///
/// This is the seam the [`Provider`](crate::provider::Provider) syncs against. It is
/// implemented over HTTP by [`Client`](crate::client::Client), and in memory by
/// [`MockRemote`](crate::mock_remote::MockRemote) so the sync engine can be exercised
/// without a server.
#[async_trait]
pub trait RemoteSource {
    /// Fetches the current remote document.
    /// This can be a long process, and it can fail (e.g. a network error); failures
    /// must leave the remote copy untouched.
    async fn fetch_document(&self) -> Result<Document>;

    /// Replaces the remote copy with `document`, wholesale.
    async fn push_document(&self, document: &Document) -> Result<()>;
}
