//! Destination URL validation.
//!
//! A destination must parse as an absolute URL with a non-empty scheme and
//! host, and its host must not point back at this machine or at the service
//! itself. The input string is never rewritten: deduplication compares the
//! literal text the caller sent.

use std::net::{Ipv4Addr, Ipv6Addr};

use serde_json::json;
use url::{Host, Url};

use crate::error::AppError;

/// Hostnames that always resolve to the local machine.
const DEFAULT_BLACKLISTED_HOSTS: &[&str] = &["localhost", "localhost.localdomain"];

/// Host denylist applied to every destination URL.
///
/// Loopback and unspecified IP addresses are always rejected. Named hosts
/// are compared case-insensitively against the built-in list plus any
/// configured extras (typically the service's own public hostnames).
#[derive(Debug, Clone)]
pub struct HostBlacklist {
    hosts: Vec<String>,
}

impl Default for HostBlacklist {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl HostBlacklist {
    /// Creates a denylist from the built-in hosts plus `extra_hosts`.
    pub fn new<I, S>(extra_hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hosts: Vec<String> = DEFAULT_BLACKLISTED_HOSTS
            .iter()
            .map(|h| h.to_string())
            .collect();

        for host in extra_hosts {
            let host = host.as_ref().trim().trim_end_matches('.').to_ascii_lowercase();
            if !host.is_empty() && !hosts.contains(&host) {
                hosts.push(host);
            }
        }

        Self { hosts }
    }

    /// Returns true if `host` must not be shortened.
    pub fn contains(&self, host: &Host<&str>) -> bool {
        match host {
            Host::Domain(domain) => {
                let domain = domain.trim_end_matches('.').to_ascii_lowercase();
                domain.ends_with(".localhost") || self.hosts.iter().any(|h| *h == domain)
            }
            Host::Ipv4(ip) => is_local_ipv4(ip),
            Host::Ipv6(ip) => is_local_ipv6(ip),
        }
    }

    /// Returns the named hosts in the denylist.
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }
}

fn is_local_ipv4(ip: &Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_unspecified()
}

fn is_local_ipv6(ip: &Ipv6Addr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return true;
    }

    match ip.to_ipv4_mapped() {
        Some(v4) => is_local_ipv4(&v4),
        None => false,
    }
}

/// Validates a destination URL and returns the input unchanged.
///
/// # Rules
///
/// 1. Parses as an absolute URL
/// 2. Has a non-empty scheme and a non-empty host
/// 3. Host is not on the [`HostBlacklist`]
///
/// # Errors
///
/// Returns [`AppError::InvalidUrl`] for rules 1-2 and
/// [`AppError::BlacklistedUrl`] for rule 3.
///
/// # Examples
///
/// ```ignore
/// let blacklist = HostBlacklist::default();
/// assert!(validate_url("https://example.com", &blacklist).is_ok());
/// assert!(validate_url("notaurl", &blacklist).is_err());
/// assert!(validate_url("http://localhost:8080/x", &blacklist).is_err());
/// ```
pub fn validate_url<'a>(input: &'a str, blacklist: &HostBlacklist) -> Result<&'a str, AppError> {
    let parsed = Url::parse(input).map_err(|e| {
        AppError::invalid_url(
            "The url is not valid",
            json!({ "url": input, "reason": e.to_string() }),
        )
    })?;

    if parsed.scheme().is_empty() {
        return Err(AppError::invalid_url(
            "The url is not valid",
            json!({ "url": input, "reason": "missing scheme" }),
        ));
    }

    let host = match parsed.host() {
        Some(Host::Domain("")) | None => {
            return Err(AppError::invalid_url(
                "The url is not valid",
                json!({ "url": input, "reason": "missing host" }),
            ));
        }
        Some(host) => host,
    };

    if blacklist.contains(&host) {
        return Err(AppError::blacklisted_url(
            "The url points to a blacklisted host",
            json!({ "url": input, "host": host.to_string() }),
        ));
    }

    Ok(input)
}

/// Serializes a stored URL into a form that is always valid in a `Location` header.
///
/// Non-ASCII characters are percent-encoded or punycoded by the parser. Falls
/// back to the stored text if it no longer parses.
pub fn to_location(stored: &str) -> String {
    Url::parse(stored)
        .map(String::from)
        .unwrap_or_else(|_| stored.to_string())
}
