use std::collections::BTreeMap;
use std::time::Instant;

use serde_json::Value;
use sweep_core::{host_value, meta_keys, MetaValue};
use sweep_logging::sweep_debug;

use crate::http::{api_url, get_json, parse_base};
use crate::{CheckError, FailureKind, HttpSettings};

/// A successful verdict: the oracle's normalized address plus whatever it
/// reported about it.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleVerdict {
    pub address: String,
    pub metadata: BTreeMap<String, MetaValue>,
}

#[async_trait::async_trait]
pub trait Oracle: Send + Sync {
    async fn check(&self, address: &str) -> Result<OracleVerdict, CheckError>;
}

/// Talks to the worker's `api/check` and `api/ip-info` endpoints.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    base: url::Url,
    client: reqwest::Client,
    max_bytes: u64,
}

impl HttpOracle {
    pub fn new(worker_url: &str, settings: &HttpSettings) -> Result<Self, CheckError> {
        Ok(Self {
            base: parse_base(worker_url)?,
            client: settings.build_client()?,
            max_bytes: settings.max_bytes,
        })
    }

    async fn ip_info(&self, host: &str) -> Result<Value, CheckError> {
        let url = api_url(&self.base, "ip-info", &[("ip", host)]);
        get_json(&self.client, url, self.max_bytes).await
    }
}

#[async_trait::async_trait]
impl Oracle for HttpOracle {
    async fn check(&self, address: &str) -> Result<OracleVerdict, CheckError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(CheckError::new(FailureKind::InvalidAddress, "empty address"));
        }

        let started = Instant::now();
        let url = api_url(&self.base, "check", &[("proxyip", address)]);
        let body = get_json(&self.client, url, self.max_bytes).await?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        if body.get("success").and_then(Value::as_bool) != Some(true) {
            let reason = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unsuccessful");
            return Err(CheckError::new(FailureKind::Rejected, reason));
        }

        let normalized = body
            .get("proxyIP")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(address)
            .trim()
            .to_string();

        let mut metadata = BTreeMap::new();
        merge_fields(&mut metadata, &body, &["success", "proxyIP", "error"]);
        metadata
            .entry(meta_keys::LATENCY_MS.to_string())
            .or_insert(MetaValue::Number(elapsed_ms.round()));

        let host = host_value(&normalized)
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| normalized.clone());
        match self.ip_info(&host).await {
            Ok(info) => merge_fields(&mut metadata, &info, &["ip", "error", "readme"]),
            Err(err) => sweep_debug!("ip-info for {host} unavailable: {err}"),
        }

        Ok(OracleVerdict {
            address: normalized,
            metadata,
        })
    }
}

/// Copy scalar top-level fields of `source` into `into`, later keys winning.
fn merge_fields(into: &mut BTreeMap<String, MetaValue>, source: &Value, skip: &[&str]) {
    let Some(object) = source.as_object() else {
        return;
    };
    for (key, value) in object {
        if skip.contains(&key.as_str()) {
            continue;
        }
        let value = match value {
            Value::String(text) => MetaValue::Text(text.clone()),
            Value::Number(number) => match number.as_f64() {
                Some(n) => MetaValue::Number(n),
                None => continue,
            },
            Value::Bool(flag) => MetaValue::Text(flag.to_string()),
            _ => continue,
        };
        into.insert(key.clone(), value);
    }
}
