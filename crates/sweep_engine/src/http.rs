use std::time::Duration;

use futures_util::StreamExt;
use serde_json::Value;

use crate::{CheckError, FailureKind};

/// Timeouts and size cap for the worker API and bulk-source fetches.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(45),
            max_bytes: 8 * 1024 * 1024,
        }
    }
}

impl HttpSettings {
    /// Settings for static list downloads.
    pub fn for_sources() -> Self {
        Self {
            request_timeout: Duration::from_secs(15),
            ..Self::default()
        }
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, CheckError> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
            .map_err(|err| CheckError::new(FailureKind::Network, err.to_string()))
    }
}

/// GET `url` and return the body, refusing anything over `max_bytes`.
pub(crate) async fn get_body(
    client: &reqwest::Client,
    url: url::Url,
    max_bytes: u64,
) -> Result<Vec<u8>, CheckError> {
    let response = client.get(url).send().await.map_err(map_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(CheckError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    if response.content_length().is_some_and(|len| len > max_bytes) {
        return Err(CheckError::new(
            FailureKind::TooLarge { max_bytes },
            "response too large",
        ));
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
            return Err(CheckError::new(
                FailureKind::TooLarge { max_bytes },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

pub(crate) async fn get_json(
    client: &reqwest::Client,
    url: url::Url,
    max_bytes: u64,
) -> Result<Value, CheckError> {
    let bytes = get_body(client, url, max_bytes).await?;
    serde_json::from_slice(&bytes).map_err(|err| CheckError::new(FailureKind::Decode, err.to_string()))
}

/// Join an API path onto the worker base, keeping any base path prefix.
pub(crate) fn api_url(base: &url::Url, endpoint: &str, query: &[(&str, &str)]) -> url::Url {
    let mut url = base.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    let path = format!("{}api/{endpoint}", url.path());
    url.set_path(&path);
    url.query_pairs_mut().clear().extend_pairs(query);
    url
}

pub(crate) fn parse_base(worker_url: &str) -> Result<url::Url, CheckError> {
    url::Url::parse(worker_url.trim())
        .map_err(|err| CheckError::new(FailureKind::InvalidAddress, format!("{worker_url}: {err}")))
}

fn map_reqwest_error(err: reqwest::Error) -> CheckError {
    if err.is_timeout() {
        return CheckError::new(FailureKind::Timeout, err.to_string());
    }
    CheckError::new(FailureKind::Network, err.to_string())
}
