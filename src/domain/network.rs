// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use thiserror::Error;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid prefix length: {0} (must be 0-32 for IPv4, 0-128 for IPv6)")]
    InvalidPrefixLength(u8),

    #[error("Invalid netmask: {0}")]
    InvalidNetmask(String),

    #[error("Invalid MAC address format: {0}")]
    InvalidMacAddress(String),
}

/// IP address with optional CIDR prefix
///
/// # Examples
///
/// ```rust
/// use cim_machine_config::domain::IpAddressWithCidr;
///
/// let ip = IpAddressWithCidr::new("10.0.0.2/24").unwrap();
/// assert_eq!(ip.address().to_string(), "10.0.0.2");
/// assert_eq!(ip.netmask().unwrap().to_string(), "255.255.255.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IpAddressWithCidr {
    address: IpAddr,
    prefix_length: Option<u8>,
}

impl IpAddressWithCidr {
    /// Parse `a.b.c.d`, `a.b.c.d/nn` or the IPv6 equivalents
    pub fn new(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let cidr = cidr.as_ref().trim();

        match cidr.split_once('/') {
            Some((addr_str, prefix_str)) => {
                let address = IpAddr::from_str(addr_str)
                    .map_err(|_| NetworkError::InvalidIpAddress(addr_str.to_string()))?;
                if prefix_str.is_empty() || !prefix_str.chars().all(|c| c.is_ascii_digit()) {
                    return Err(NetworkError::InvalidCidr(cidr.to_string()));
                }
                let prefix_length = prefix_str
                    .parse::<u8>()
                    .map_err(|_| NetworkError::InvalidCidr(cidr.to_string()))?;
                Self::from_parts(address, Some(prefix_length))
            }
            None => {
                let address = IpAddr::from_str(cidr)
                    .map_err(|_| NetworkError::InvalidIpAddress(cidr.to_string()))?;
                Ok(Self {
                    address,
                    prefix_length: None,
                })
            }
        }
    }

    /// Create from separate address and prefix
    pub fn from_parts(address: IpAddr, prefix_length: Option<u8>) -> Result<Self, NetworkError> {
        if let Some(prefix) = prefix_length {
            let max_prefix = match address {
                IpAddr::V4(_) => 32,
                IpAddr::V6(_) => 128,
            };

            if prefix > max_prefix {
                return Err(NetworkError::InvalidPrefixLength(prefix));
            }
        }

        Ok(Self {
            address,
            prefix_length,
        })
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn prefix_length(&self) -> Option<u8> {
        self.prefix_length
    }

    pub fn is_ipv4(&self) -> bool {
        self.address.is_ipv4()
    }

    /// Dotted IPv4 netmask derived from the prefix, if there is one
    pub fn netmask(&self) -> Option<Ipv4Addr> {
        match (self.address, self.prefix_length) {
            (IpAddr::V4(_), Some(prefix)) => Some(prefix_to_netmask(prefix)),
            _ => None,
        }
    }

    pub fn as_cidr(&self) -> String {
        match self.prefix_length {
            Some(prefix) => format!("{}/{}", self.address, prefix),
            None => self.address.to_string(),
        }
    }
}

fn prefix_to_netmask(prefix: u8) -> Ipv4Addr {
    let bits = if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix))
    };
    Ipv4Addr::from(bits)
}

/// Validate a dotted IPv4 netmask (contiguous leading ones)
pub fn parse_netmask(mask: &str) -> Result<Ipv4Addr, NetworkError> {
    let parsed = Ipv4Addr::from_str(mask.trim())
        .map_err(|_| NetworkError::InvalidNetmask(mask.to_string()))?;
    let bits = u32::from(parsed);
    if bits.leading_ones() + bits.trailing_zeros() != 32 {
        return Err(NetworkError::InvalidNetmask(mask.to_string()));
    }
    Ok(parsed)
}

impl fmt::Display for IpAddressWithCidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cidr())
    }
}

impl FromStr for IpAddressWithCidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for IpAddressWithCidr {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IpAddressWithCidr> for String {
    fn from(value: IpAddressWithCidr) -> Self {
        value.as_cidr()
    }
}

/// 48-bit MAC address, rendered lowercase and colon-separated
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Accepts `00:11:22:33:44:55`, `00-11-22-33-44-55` or `001122334455`
    pub fn new(mac: impl AsRef<str>) -> Result<Self, NetworkError> {
        let mac = mac.as_ref();
        let mac_clean = mac.replace([':', '-'], "");

        if mac_clean.len() != 12 || !mac_clean.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(NetworkError::InvalidMacAddress(mac.to_string()));
        }

        let mut octets = [0u8; 6];
        for (i, chunk) in mac_clean.as_bytes().chunks(2).enumerate() {
            let hex_str = std::str::from_utf8(chunk)
                .map_err(|_| NetworkError::InvalidMacAddress(mac.to_string()))?;
            octets[i] = u8::from_str_radix(hex_str, 16)
                .map_err(|_| NetworkError::InvalidMacAddress(mac.to_string()))?;
        }

        Ok(Self(octets))
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn as_string(&self) -> String {
        self.0
            .iter()
            .map(|octet| format!("{:02x}", octet))
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl FromStr for MacAddress {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MacAddress> for String {
    fn from(value: MacAddress) -> Self {
        value.as_string()
    }
}
