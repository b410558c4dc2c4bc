use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::model::{self, Record};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/data";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("payload from {origin} is not a JSON array of records: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the record list comes from. Fetched exactly once per session.
pub trait RecordSource {
    fn describe(&self) -> String;

    fn fetch(&self) -> impl Future<Output = Result<Vec<Record>, FetchError>> + Send;
}

#[derive(Clone, Debug)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: &str, timeout_seconds: u64) -> Result<Self, FetchError> {
        let timeout = Duration::from_secs(timeout_seconds.max(1));
        let client = reqwest::Client::builder()
            .user_agent(concat!("datatable/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::ClientBuild { source: e })?;
        Ok(Self {
            client,
            url: url.trim().to_string(),
        })
    }
}

impl RecordSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> impl Future<Output = Result<Vec<Record>, FetchError>> + Send {
        async move {
            let response = self
                .client
                .get(&self.url)
                .send()
                .await
                .map_err(|e| FetchError::Request {
                    url: self.url.clone(),
                    source: e,
                })?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: self.url.clone(),
                    status: status.as_u16(),
                });
            }
            let body = response.bytes().await.map_err(|e| FetchError::Request {
                url: self.url.clone(),
                source: e,
            })?;
            model::parse_records(&body).map_err(|e| FetchError::Decode {
                origin: self.url.clone(),
                source: e,
            })
        }
    }
}

#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> impl Future<Output = Result<Vec<Record>, FetchError>> + Send {
        async move {
            let origin = self.describe();
            let body = tokio::fs::read(&self.path)
                .await
                .map_err(|e| FetchError::Read {
                    path: origin.clone(),
                    source: e,
                })?;
            model::parse_records(&body).map_err(|e| FetchError::Decode { origin, source: e })
        }
    }
}

#[derive(Clone, Debug)]
pub struct RecordStore {
    records: Vec<Record>,
    loading: bool,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: true,
        }
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the one fetch. Failures are logged and absorbed: the store stays
    /// empty, which the view cannot tell apart from an empty result.
    pub async fn load<S: RecordSource>(self, source: &S) -> Self {
        let origin = source.describe();
        tracing::debug!(%origin, "fetching records");
        let records = match source.fetch().await {
            Ok(records) => {
                tracing::info!(%origin, count = records.len(), "records fetched");
                records
            }
            Err(e) => {
                tracing::error!(%origin, error = %e, "error fetching data");
                self.records
            }
        };
        Self {
            records,
            loading: false,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
