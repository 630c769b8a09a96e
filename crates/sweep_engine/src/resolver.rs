use serde_json::Value;

use crate::http::{api_url, get_json, parse_base};
use crate::{CheckError, FailureKind, HttpSettings};

#[async_trait::async_trait]
pub trait Resolver: Send + Sync {
    /// Addresses attributable to `domain`, in the order the resolver gave them.
    async fn resolve(&self, domain: &str) -> Result<Vec<String>, CheckError>;
}

/// Resolves through the worker's `api/resolve` endpoint.
#[derive(Debug, Clone)]
pub struct HttpResolver {
    base: url::Url,
    client: reqwest::Client,
    max_bytes: u64,
}

impl HttpResolver {
    pub fn new(worker_url: &str, settings: &HttpSettings) -> Result<Self, CheckError> {
        Ok(Self {
            base: parse_base(worker_url)?,
            client: settings.build_client()?,
            max_bytes: settings.max_bytes,
        })
    }
}

#[async_trait::async_trait]
impl Resolver for HttpResolver {
    async fn resolve(&self, domain: &str) -> Result<Vec<String>, CheckError> {
        let url = api_url(&self.base, "resolve", &[("domain", domain)]);
        let body = get_json(&self.client, url, self.max_bytes).await?;
        if body.get("success").and_then(Value::as_bool) != Some(true) {
            let reason = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("resolution failed");
            return Err(CheckError::new(FailureKind::Rejected, reason));
        }
        let ips = body
            .get("ips")
            .and_then(Value::as_array)
            .map(|ips| {
                ips.iter()
                    .filter_map(Value::as_str)
                    .map(|ip| ip.trim().to_string())
                    .filter(|ip| !ip.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Ok(ips)
    }
}
