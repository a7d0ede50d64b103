//! Dataset fetcher: the backend REST surface behind one async trait.

mod client;

pub use client::{AnalysisReceipt, ApiClient};

use crate::model::{AnalysisPayload, HealthReport, NetworkGraph, Suspect};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered HTTP {status}")]
    Status { status: u16, url: String },
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot build request URL: {0}")]
    Url(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read side of the backend. Every view that needs data goes through this.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// `GET /data`
    async fn analysis(&self) -> Result<AnalysisPayload, FetchError>;

    /// `GET /investigation/suspects`
    async fn suspects(&self) -> Result<Vec<Suspect>, FetchError>;

    /// `GET /investigation/network/{id}`
    async fn network(&self, suspect_id: &str) -> Result<NetworkGraph, FetchError>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthReport, FetchError>;
}
