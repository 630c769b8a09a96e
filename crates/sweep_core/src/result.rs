use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::candidate::Provenance;

/// Metadata keys the report knows how to display.
pub mod meta_keys {
    pub const COUNTRY: &str = "country";
    pub const AS: &str = "as";
    pub const ORG: &str = "org";
    pub const LATENCY_MS: &str = "latency_ms";
    pub const RISK_SCORE: &str = "risk_score";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Number(f64),
    Text(String),
}

impl MetaValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetaValue::Number(n) => Some(*n),
            MetaValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            MetaValue::Number(n) => write!(f, "{n:.1}"),
            MetaValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_string())
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Number(value)
    }
}

/// A successful check: the oracle's normalized address and metadata, plus the
/// provenance of the candidate that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub address: String,
    pub metadata: BTreeMap<String, MetaValue>,
    pub provenance: Provenance,
}

impl CheckResult {
    pub fn new(
        address: impl Into<String>,
        metadata: BTreeMap<String, MetaValue>,
        provenance: Provenance,
    ) -> Self {
        Self {
            address: address.into(),
            metadata,
            provenance,
        }
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.metadata
            .get(key)
            .map(ToString::to_string)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.metadata
            .get(key)
            .and_then(MetaValue::as_number)
            .filter(|n| !n.is_nan())
    }

    pub fn risk_score(&self) -> Option<f64> {
        self.number(meta_keys::RISK_SCORE)
    }

    pub fn latency_ms(&self) -> Option<f64> {
        self.number(meta_keys::LATENCY_MS)
    }

    /// `<address> (<country> - <network>)`, with latency appended when known.
    pub fn detail_line(&self) -> String {
        let country = self
            .text(meta_keys::COUNTRY)
            .unwrap_or_else(|| "N/A".to_string());
        let network = self
            .text(meta_keys::AS)
            .or_else(|| self.text(meta_keys::ORG))
            .unwrap_or_else(|| "N/A".to_string());
        let mut line = format!("{} ({country} - {network})", self.address);
        if let Some(latency) = self.latency_ms() {
            line.push_str(&format!(" {}ms", latency.round() as i64));
        }
        line
    }
}
