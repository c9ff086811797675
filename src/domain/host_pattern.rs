// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host patterns used by firewall rules
//!
//! A pattern is `<host-or-wildcard>[:<port>[,<port>...]]`, for example
//! `*:25,465`, `updates.example:443` or `[2001:db8::1]:22`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Hostname, IpAddressWithCidr};
use crate::errors::ModelError;

/// Host part of a [`HostPattern`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternHost {
    /// `*`, any remote host
    Any,
    Name(Hostname),
    Ip(IpAddressWithCidr),
}

impl fmt::Display for PatternHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Name(name) => write!(f, "{}", name),
            Self::Ip(ip) => write!(f, "{}", ip),
        }
    }
}

/// Allow-listed remote host with optional destination ports
///
/// Ports are kept sorted and de-duplicated, so `*:465,25` and `*:25,465`
/// are the same pattern.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostPattern {
    host: PatternHost,
    ports: Vec<u16>,
}

impl HostPattern {
    pub fn new(host: PatternHost, ports: impl IntoIterator<Item = u16>) -> Self {
        let mut ports: Vec<u16> = ports.into_iter().collect();
        ports.sort_unstable();
        ports.dedup();
        Self { host, ports }
    }

    /// Parse a pattern, failing with [`ModelError::InvalidHost`]
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ModelError::InvalidHost("empty host pattern".to_string()));
        }

        let (host_text, ports_text) = split_host_and_ports(text)?;
        let host = parse_pattern_host(host_text)?;
        let ports = match ports_text {
            Some(ports) => parse_ports(text, ports)?,
            None => Vec::new(),
        };

        Ok(Self::new(host, ports))
    }

    pub fn host(&self) -> &PatternHost {
        &self.host
    }

    /// Destination ports; empty means every port
    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    pub fn is_wildcard(&self) -> bool {
        self.host == PatternHost::Any
    }
}

fn split_host_and_ports(text: &str) -> Result<(&str, Option<&str>), ModelError> {
    if let Some(rest) = text.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| ModelError::InvalidHost(text.to_string()))?;
        return match tail {
            "" => Ok((host, None)),
            _ => match tail.strip_prefix(':') {
                Some(ports) => Ok((host, Some(ports))),
                None => Err(ModelError::InvalidHost(text.to_string())),
            },
        };
    }

    // Bare IPv6 literals carry several colons and cannot have ports
    if text.matches(':').count() > 1 {
        return Ok((text, None));
    }

    Ok(match text.split_once(':') {
        Some((host, ports)) => (host, Some(ports)),
        None => (text, None),
    })
}

fn parse_pattern_host(host: &str) -> Result<PatternHost, ModelError> {
    if host == "*" {
        return Ok(PatternHost::Any);
    }

    if let Ok(ip) = IpAddressWithCidr::new(host) {
        return Ok(PatternHost::Ip(ip));
    }

    Ok(PatternHost::Name(Hostname::new(host)?))
}

fn parse_ports(pattern: &str, ports: &str) -> Result<Vec<u16>, ModelError> {
    ports
        .split(',')
        .map(|port| match port.trim().parse::<u16>() {
            Ok(0) | Err(_) => Err(ModelError::InvalidHost(format!(
                "invalid port '{}' in {}",
                port, pattern
            ))),
            Ok(port) => Ok(port),
        })
        .collect()
}

impl fmt::Display for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            PatternHost::Ip(ip) if !ip.is_ipv4() && !self.ports.is_empty() => {
                write!(f, "[{}]", ip)?
            }
            host => write!(f, "{}", host)?,
        }

        if !self.ports.is_empty() {
            let ports: Vec<String> = self.ports.iter().map(u16::to_string).collect();
            write!(f, ":{}", ports.join(","))?;
        }

        Ok(())
    }
}

impl FromStr for HostPattern {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HostPattern {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HostPattern> for String {
    fn from(value: HostPattern) -> Self {
        value.to_string()
    }
}
