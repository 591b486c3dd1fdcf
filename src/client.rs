//! This module provides a client to connect to a cloud endpoint
//!
//! The endpoint contract is deliberately small: a GET returns the current document as
//! JSON, a POST with a JSON body replaces it. No authentication, no pagination, no
//! partial updates.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::config;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::traits::RemoteSource;

/// How long a single exchange with the endpoint may take. The endpoint contract does
/// not define a timeout, and without one a stalled server would pin the sync engine
/// in its Syncing state indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A [`RemoteSource`] that lives behind an HTTP endpoint
pub struct Client {
    endpoint: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not contact the endpoint.
    pub fn new<S: AsRef<str>>(endpoint: S) -> Result<Self> {
        let endpoint = Url::parse(endpoint.as_ref())
            .map_err(|err| Error::Validation(format!("invalid endpoint URL: {}", err)))?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(config::app_name())
            .build()
            .map_err(|err| Error::SyncTransport(err.to_string()))?;

        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteSource for Client {
    async fn fetch_document(&self) -> Result<Document> {
        let response = self.http.get(self.endpoint.clone()).send().await?;

        if response.status().is_success() == false {
            return Err(Error::SyncTransport(format!(
                "unexpected HTTP status code {} from {}",
                response.status(),
                self.endpoint
            )));
        }

        let mut document: Document = response
            .json()
            .await
            .map_err(|err| Error::SyncTransport(format!("malformed remote document: {}", err)))?;
        document.normalize();
        Ok(document)
    }

    async fn push_document(&self, document: &Document) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(document)
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(Error::SyncTransport(format!(
                "unexpected HTTP status code {} from {}",
                response.status(),
                self.endpoint
            )));
        }

        Ok(())
    }
}
