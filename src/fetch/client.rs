use super::{DataSource, FetchError};
use crate::model::{AnalysisPayload, HealthReport, NetworkGraph, Suspect};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP client for the analysis backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base = Url::parse(base_url).map_err(|e| FetchError::Url(format!("{base_url}: {e}")))?;
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ringlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FetchError::Http {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Url(format!("{} cannot carry a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        debug!(url = %url, "GET");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;
        Ok(body.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, FetchError> {
        let url = self.endpoint(segments)?;
        let body = self.get_bytes(url.clone()).await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Raw `/export/json` body, not parsed.
    pub async fn export_json(&self) -> Result<Vec<u8>, FetchError> {
        let url = self.endpoint(&["export", "json"])?;
        self.get_bytes(url).await
    }

    /// Upload a CSV to `/analyze` as multipart field `file`.
    pub async fn analyze_csv(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<AnalysisReceipt, FetchError> {
        let url = self.endpoint(&["analyze"])?;
        let http_err = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .map_err(http_err)?;
        let form = Form::new().part("file", part);

        debug!(url = %url, file = file_name, "POST multipart");
        let response = self
            .http
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.bytes().await.map_err(http_err)?;
        let value: serde_json::Value =
            serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
                url: url.to_string(),
                source,
            })?;
        Ok(AnalysisReceipt::from_value(&value))
    }
}

#[async_trait]
impl DataSource for ApiClient {
    async fn analysis(&self) -> Result<AnalysisPayload, FetchError> {
        self.get_json(&["data"]).await
    }

    async fn suspects(&self) -> Result<Vec<Suspect>, FetchError> {
        let raw: Vec<Option<Suspect>> = self.get_json(&["investigation", "suspects"]).await?;
        Ok(raw.into_iter().flatten().filter(|s| !s.id.is_empty()).collect())
    }

    async fn network(&self, suspect_id: &str) -> Result<NetworkGraph, FetchError> {
        self.get_json(&["investigation", "network", suspect_id]).await
    }

    async fn health(&self) -> Result<HealthReport, FetchError> {
        self.get_json(&["health"]).await
    }
}

/// Headline numbers from an `/analyze` completion payload. Read loosely:
/// missing fields count as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReceipt {
    pub batch_id: Option<String>,
    pub total_transactions: u64,
    pub suspicious_nodes: usize,
    pub rings: usize,
}

impl AnalysisReceipt {
    pub fn from_value(value: &serde_json::Value) -> Self {
        let count = |key: &str| value.get(key).and_then(|v| v.as_array()).map_or(0, Vec::len);
        Self {
            batch_id: value
                .get("batch_id")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            total_transactions: value
                .get("total_transactions")
                .and_then(|v| v.as_u64())
                .unwrap_or(0),
            suspicious_nodes: count("suspicious_nodes"),
            rings: count("rings"),
        }
    }
}
