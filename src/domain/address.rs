// Copyright (c) 2025 - Cowboy AI, Inc.
//! Address resolution for declaration literals
//!
//! Pure functions that turn declaration text into validated host, IP and
//! email value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{HostPattern, Hostname, IpAddressWithCidr};
use crate::errors::{ModelError, ModelResult};

/// Contact email address, `local@domain`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress {
    local: String,
    domain: Hostname,
}

impl EmailAddress {
    /// Longest local part RFC 5321 allows
    pub const MAX_LOCAL_LENGTH: usize = 64;

    pub fn new(text: impl AsRef<str>) -> ModelResult<Self> {
        let text = text.as_ref().trim();
        let invalid = || ModelError::InvalidEmailAddress(text.to_string());

        let (local, domain) = text.split_once('@').ok_or_else(invalid)?;
        if domain.contains('@') || !is_valid_local_part(local) {
            return Err(invalid());
        }

        let domain = Hostname::new(domain).map_err(|_| invalid())?;
        if !domain.is_fqdn() {
            return Err(invalid());
        }

        Ok(Self {
            local: local.to_string(),
            domain,
        })
    }

    pub fn local_part(&self) -> &str {
        &self.local
    }

    pub fn domain(&self) -> &Hostname {
        &self.domain
    }
}

fn is_valid_local_part(local: &str) -> bool {
    const SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~.";

    !local.is_empty()
        && local.len() <= EmailAddress::MAX_LOCAL_LENGTH
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || SPECIALS.contains(c))
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

impl FromStr for EmailAddress {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.to_string()
    }
}

/// Stateless resolver for declaration literals
pub struct AddressResolver;

impl AddressResolver {
    /// Resolve a firewall host pattern such as `*:25,465`
    pub fn resolve_host(text: &str) -> ModelResult<HostPattern> {
        HostPattern::parse(text)
    }

    /// Resolve a strict DNS name (FQDNs, CNAMEs)
    pub fn resolve_hostname(text: &str) -> ModelResult<Hostname> {
        Ok(Hostname::new(text)?)
    }

    /// Resolve an optional IP literal; absent or blank text is `Ok(None)`
    pub fn resolve_ip(text: Option<&str>) -> ModelResult<Option<IpAddressWithCidr>> {
        match text.map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => Ok(Some(IpAddressWithCidr::new(text)?)),
        }
    }

    pub fn resolve_email(text: &str) -> ModelResult<EmailAddress> {
        EmailAddress::new(text)
    }
}
