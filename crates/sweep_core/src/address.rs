//! Address parsing helpers: range expansion, bulk extraction, domain checks
//! and the export ordering.

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::LazyLock;

use regex::Regex;

use crate::candidate::normalize_address;

/// Largest number of addresses a single range may expand to.
pub const MAX_RANGE_ADDRESSES: u64 = 65_536;

static EMBEDDED_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}(?::\d+)?\b").expect("address pattern compiles")
});

static DOMAIN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,63}$")
        .expect("domain pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("invalid range syntax: {0}")]
    Syntax(String),
    #[error("range {range} covers {count} addresses (max {max})")]
    TooLarge { range: String, count: u64, max: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("domain {0:?} must not contain a protocol or slashes")]
    HasScheme(String),
    #[error("domain {0:?} is malformed")]
    Malformed(String),
}

/// Expand `a.b.c.d/n` or `a.b.c.x-y` into individual addresses.
///
/// CIDR blocks yield host addresses only (network and broadcast are skipped
/// for prefixes shorter than /31).
pub fn expand_range(input: &str) -> Result<Vec<String>, RangeError> {
    let input = input.trim();
    if let Some((base, prefix)) = input.split_once('/') {
        return expand_cidr(input, base, prefix);
    }
    if input.contains('-') {
        return expand_octet_span(input);
    }
    Err(RangeError::Syntax(input.to_string()))
}

fn expand_cidr(input: &str, base: &str, prefix: &str) -> Result<Vec<String>, RangeError> {
    let syntax = || RangeError::Syntax(input.to_string());
    let base: Ipv4Addr = base.trim().parse().map_err(|_| syntax())?;
    let prefix: u32 = prefix.trim().parse().map_err(|_| syntax())?;
    if prefix > 32 {
        return Err(syntax());
    }

    let count = 1u64 << (32 - prefix);
    if count > MAX_RANGE_ADDRESSES {
        return Err(RangeError::TooLarge {
            range: input.to_string(),
            count,
            max: MAX_RANGE_ADDRESSES,
        });
    }

    let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
    let network = u64::from(u32::from(base) & mask);
    let last = network + count - 1;
    let (first, last) = if prefix >= 31 {
        (network, last)
    } else {
        (network + 1, last - 1)
    };

    Ok((first..=last)
        .map(|raw| Ipv4Addr::from(raw as u32).to_string())
        .collect())
}

fn expand_octet_span(input: &str) -> Result<Vec<String>, RangeError> {
    let syntax = || RangeError::Syntax(input.to_string());
    let (prefix, span) = input.rsplit_once('.').ok_or_else(syntax)?;
    let (start, end) = span.split_once('-').ok_or_else(syntax)?;
    let start: u8 = start.trim().parse().map_err(|_| syntax())?;
    let end: u8 = end.trim().parse().map_err(|_| syntax())?;
    if start > end {
        return Err(syntax());
    }
    // The three leading octets must form a valid address prefix on their own.
    format!("{prefix}.0")
        .parse::<Ipv4Addr>()
        .map_err(|_| syntax())?;

    Ok((start..=end).map(|octet| format!("{prefix}.{octet}")).collect())
}

/// Scan arbitrary text for IPv4 addresses with an optional `:port` suffix.
///
/// Extraction order in the source text is not meaningful, so the result is
/// deduplicated and put in export order.
pub fn extract_addresses(text: &str) -> Vec<String> {
    sort_for_export(
        EMBEDDED_ADDRESS
            .find_iter(text)
            .map(|m| m.as_str().to_string()),
    )
}

/// Reject domains carrying a scheme or path, or not matching the label pattern.
pub fn validate_domain(domain: &str) -> Result<(), DomainError> {
    let domain = domain.trim();
    if domain.contains("http://") || domain.contains("https://") || domain.contains('/') {
        return Err(DomainError::HasScheme(domain.to_string()));
    }
    if !DOMAIN_NAME.is_match(domain) {
        return Err(DomainError::Malformed(domain.to_string()));
    }
    Ok(())
}

/// The host part of an address, without port or IPv6 brackets, as an `IpAddr`.
pub fn host_value(address: &str) -> Option<IpAddr> {
    let address = address.trim();
    if let Some(rest) = address.strip_prefix('[') {
        let (host, _) = rest.split_once(']')?;
        return host.parse().ok();
    }
    if let Ok(ip) = address.parse::<IpAddr>() {
        return Some(ip);
    }
    match address.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.parse::<u16>().is_ok() => {
            host.parse().ok()
        }
        _ => None,
    }
}

/// Deduplicate by normalized address and order for export.
///
/// When every entry parses as an address the list is ordered by numeric
/// value (ties broken by the full text, so ports sort deterministically);
/// otherwise the whole list falls back to lexicographic order.
pub fn sort_for_export<S: AsRef<str>>(addresses: impl IntoIterator<Item = S>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = addresses
        .into_iter()
        .map(|a| normalize_address(a.as_ref()))
        .filter(|a| !a.is_empty() && seen.insert(a.clone()))
        .collect();

    let keys: Option<Vec<IpAddr>> = unique.iter().map(|a| host_value(a)).collect();
    match keys {
        Some(keys) => {
            let mut keyed: Vec<(IpAddr, String)> = keys.into_iter().zip(unique).collect();
            keyed.sort();
            keyed.into_iter().map(|(_, address)| address).collect()
        }
        None => {
            unique.sort();
            unique
        }
    }
}
