//! Static address lists fetched by country code or arbitrary URL.

use sweep_core::{country_name, extract_addresses, ALL_COUNTRIES};
use sweep_logging::sweep_info;

use crate::http::get_body;
use crate::{HttpSettings, SourceError};

pub const COUNTRY_LIST_BASE: &str =
    "https://raw.githubusercontent.com/NiREvil/vless/main/sub/country_proxies/";
const ALL_COUNTRIES_FILE: &str = "02_proxies.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    Country(String),
    Url(String),
}

impl SourceRef {
    /// Human-readable name used in job titles.
    pub fn display_name(&self) -> String {
        match self {
            SourceRef::Country(code) => country_name(code)
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| code.to_ascii_uppercase()),
            SourceRef::Url(url) => url.clone(),
        }
    }
}

/// Fetches a source body and scans it for embedded addresses.
#[derive(Debug, Clone)]
pub struct BulkSource {
    client: reqwest::Client,
    country_base: url::Url,
    max_bytes: u64,
}

impl BulkSource {
    pub fn new(settings: &HttpSettings) -> Result<Self, SourceError> {
        Self::with_country_base(settings, COUNTRY_LIST_BASE)
    }

    pub fn with_country_base(settings: &HttpSettings, country_base: &str) -> Result<Self, SourceError> {
        let country_base = url::Url::parse(country_base).map_err(|err| SourceError::InvalidUrl {
            url: country_base.to_string(),
            reason: err.to_string(),
        })?;
        let client = settings.build_client().map_err(|source| SourceError::Fetch {
            origin: country_base.to_string(),
            source,
        })?;
        Ok(Self {
            client,
            country_base,
            max_bytes: settings.max_bytes,
        })
    }

    pub fn url_for(&self, source: &SourceRef) -> Result<url::Url, SourceError> {
        match source {
            SourceRef::Country(code) => {
                let code = code.trim().to_ascii_uppercase();
                if country_name(&code).is_none() {
                    return Err(SourceError::UnknownCountry(code));
                }
                let file = if code == ALL_COUNTRIES {
                    ALL_COUNTRIES_FILE.to_string()
                } else {
                    format!("{code}.txt")
                };
                self.country_base
                    .join(&file)
                    .map_err(|err| SourceError::InvalidUrl {
                        url: file,
                        reason: err.to_string(),
                    })
            }
            SourceRef::Url(raw) => {
                let url = url::Url::parse(raw.trim()).map_err(|err| SourceError::InvalidUrl {
                    url: raw.clone(),
                    reason: err.to_string(),
                })?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(SourceError::InvalidUrl {
                        url: raw.clone(),
                        reason: "only http and https are supported".into(),
                    });
                }
                Ok(url)
            }
        }
    }

    /// Deduplicated, sorted addresses found in the source body.
    pub async fn fetch(&self, source: &SourceRef) -> Result<Vec<String>, SourceError> {
        let url = self.url_for(source)?;
        let origin = url.to_string();
        let body = get_body(&self.client, url, self.max_bytes)
            .await
            .map_err(|source| SourceError::Fetch {
                origin: origin.clone(),
                source,
            })?;
        let text = String::from_utf8_lossy(&body);
        let addresses = extract_addresses(&text);
        sweep_info!("{} addresses extracted from {origin}", addresses.len());
        Ok(addresses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_codes_map_to_list_files() {
        let source = BulkSource::new(&HttpSettings::for_sources()).unwrap();
        assert_eq!(
            source.url_for(&SourceRef::Country("de".into())).unwrap().as_str(),
            format!("{COUNTRY_LIST_BASE}DE.txt")
        );
        assert_eq!(
            source.url_for(&SourceRef::Country("ALL".into())).unwrap().as_str(),
            format!("{COUNTRY_LIST_BASE}02_proxies.csv")
        );
        assert_eq!(
            source.url_for(&SourceRef::Country("ZZ".into())),
            Err(SourceError::UnknownCountry("ZZ".into()))
        );
        assert!(source.url_for(&SourceRef::Url("ftp://x/list".into())).is_err());
    }
}
