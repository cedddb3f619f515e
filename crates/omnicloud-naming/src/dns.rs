//! DNS name normalization
//!
//! Cloud DNS APIs want fully-qualified, dot-terminated names in both record
//! names and record data. These helpers produce them from whatever the caller
//! has at hand: a bare domain from configuration, a provider-issued hostname,
//! or an endpoint URL.

use crate::error::{NamingError, Result};
use std::fmt;
use std::str::FromStr;

/// Return `name` with a trailing dot, leaving it untouched if it already has one
pub fn ensure_trailing_dot(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(NamingError::invalid("name", name, "must not be empty"));
    }
    if name.ends_with('.') {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}."))
    }
}

/// Build the fully-qualified name of `label` inside `domain`
///
/// An empty label stands for the zone apex. Edge dots on either part are
/// dropped before joining, so `fqdn("www", "example.com.")` is
/// `www.example.com.` and not `www.example.com..`. Empty labels inside
/// either part (`example..com`) are rejected.
pub fn fqdn(label: &str, domain: &str) -> Result<String> {
    let base = domain.trim_matches('.');
    if base.is_empty() {
        return Err(NamingError::invalid("domain", domain, "must not be empty"));
    }
    check_labels("domain", domain, base)?;

    let label = label.trim_matches('.');
    if label.is_empty() {
        return ensure_trailing_dot(base);
    }
    check_labels("label", label, label)?;
    ensure_trailing_dot(&format!("{label}.{base}"))
}

fn check_labels(argument: &'static str, raw: &str, trimmed: &str) -> Result<()> {
    if trimmed.split('.').any(str::is_empty) {
        return Err(NamingError::invalid(
            argument,
            raw,
            "contains an empty label (consecutive dots)",
        ));
    }
    Ok(())
}

/// CNAME record data for `target_domain`
///
/// Record data must carry the canonical, dot-terminated form; an already
/// dotted hostname passes through unchanged.
pub fn cname_rrdata(target_domain: &str) -> Result<String> {
    ensure_trailing_dot(target_domain)
}

/// Host part of an endpoint URL such as `https://acct.blob.core.windows.net/`
///
/// Userinfo and port are dropped, so `https://user@host:443/` yields `host`.
/// Bracketed IPv6 literals come back without the brackets.
pub fn endpoint_host(url: &str) -> Result<String> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);

    let (host, port) = match host_port.strip_prefix('[') {
        Some(literal) => match literal.split_once(']') {
            Some((host, tail)) if tail.is_empty() || tail.starts_with(':') => {
                (host, tail.strip_prefix(':'))
            }
            _ => return Err(NamingError::invalid("url", url, "has a malformed IPv6 host")),
        },
        None => match host_port.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        },
    };

    if port.is_some_and(|port| !port.chars().all(|c| c.is_ascii_digit())) {
        return Err(NamingError::invalid("url", url, "has a non-numeric port"));
    }
    if host.is_empty() {
        return Err(NamingError::invalid("url", url, "has no host"));
    }
    Ok(host.to_string())
}

/// A dot-terminated DNS name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainName(String);

impl DomainName {
    /// Normalize `name` to exactly one trailing dot
    ///
    /// Leading and surplus trailing dots are dropped; empty inner labels are
    /// rejected.
    pub fn parse(name: &str) -> Result<Self> {
        fqdn("", name).map(Self)
    }

    /// `label` inside `domain`, see [`fqdn`]
    pub fn from_parts(label: &str, domain: &str) -> Result<Self> {
        fqdn(label, domain).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name without its trailing dot
    pub fn relative(&self) -> &str {
        self.0.strip_suffix('.').unwrap_or(&self.0)
    }

    /// DNS names compare case-insensitively
    pub fn same_as(&self, other: &DomainName) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DomainName {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A DNS alias from `name` to `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnameRecord {
    name: DomainName,
    target: DomainName,
}

impl CnameRecord {
    /// Fails when the record would alias a name to itself
    pub fn new(name: DomainName, target: DomainName) -> Result<Self> {
        if name.same_as(&target) {
            return Err(NamingError::invalid(
                "target",
                target.into_string(),
                format!("CNAME target must differ from the record name {name}"),
            ));
        }
        Ok(Self { name, target })
    }

    /// `label.domain` aliased to `target`, normalizing all three inputs
    pub fn for_label(label: &str, domain: &str, target: &str) -> Result<Self> {
        let name = DomainName::from_parts(label, domain)?;
        let target = DomainName::parse(&cname_rrdata(target)?)?;
        Self::new(name, target)
    }

    pub fn name(&self) -> &DomainName {
        &self.name
    }

    pub fn target(&self) -> &DomainName {
        &self.target
    }

    /// Record data list as DNS record-set APIs expect it
    pub fn rrdatas(&self) -> Vec<String> {
        vec![self.target.to_string()]
    }
}
