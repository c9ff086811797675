// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network interface records and their `/etc/network/interfaces` stanzas

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::net::{IpAddr, Ipv4Addr};

use super::network::parse_netmask;
use super::{Hostname, IpAddressWithCidr, MacAddress};
use crate::declaration::InterfaceDeclaration;
use crate::errors::{ModelError, ModelResult};

/// Addressing method of an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InetMethod {
    Static,
    Dhcp,
    Manual,
}

impl InetMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dhcp => "dhcp",
            Self::Manual => "manual",
        }
    }
}

/// Which side of the machine an interface faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceZone {
    Lan,
    Wan,
}

/// A validated interface belonging to one machine
///
/// `host` always equals the FQDN of the owning machine record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInterfaceRecord {
    iface: String,
    host: Hostname,
    zone: InterfaceZone,
    inet: InetMethod,
    address: Option<IpAddressWithCidr>,
    netmask: Option<Ipv4Addr>,
    gateway: Option<IpAddr>,
    broadcast: Option<IpAddr>,
    mac: Option<MacAddress>,
    comment: Option<String>,
}

impl NetworkInterfaceRecord {
    /// Linux limits interface names to IFNAMSIZ - 1 bytes
    pub const MAX_NAME_LENGTH: usize = 15;

    pub fn from_declaration(
        host: &Hostname,
        zone: InterfaceZone,
        decl: &InterfaceDeclaration,
    ) -> ModelResult<Self> {
        let iface = decl.iface.trim().to_string();
        validate_iface_name(&iface)?;

        let invalid = |reason: String| ModelError::InvalidInterface {
            iface: iface.clone(),
            reason,
        };

        let address = parse_optional(decl.address.as_deref(), |s| IpAddressWithCidr::new(s))?;
        let gateway = parse_optional(decl.gateway.as_deref(), |s| IpAddressWithCidr::new(s))?
            .map(|gw| gw.address());
        let broadcast = parse_optional(decl.broadcast.as_deref(), |s| IpAddressWithCidr::new(s))?
            .map(|bc| bc.address());
        let mac = parse_optional(decl.mac.as_deref(), |s| MacAddress::new(s))?;

        let netmask = match parse_optional(decl.netmask.as_deref(), parse_netmask)? {
            Some(mask) => Some(mask),
            None => address.as_ref().and_then(IpAddressWithCidr::netmask),
        };

        let inet = match (decl.inet, &address) {
            (Some(InetMethod::Static), None) => {
                return Err(invalid("static addressing requires an address".to_string()))
            }
            (Some(method), _) => method,
            (None, Some(_)) => InetMethod::Static,
            (None, None) => InetMethod::Dhcp,
        };

        if inet == InetMethod::Static {
            if let Some(addr) = &address {
                if addr.is_ipv4() && netmask.is_none() {
                    return Err(invalid(format!(
                        "address {} needs a prefix or a netmask",
                        addr
                    )));
                }
            }
        }

        Ok(Self {
            iface,
            host: host.clone(),
            zone,
            inet,
            address,
            netmask,
            gateway,
            broadcast,
            mac,
            comment: decl
                .comment
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        })
    }

    pub fn iface(&self) -> &str {
        &self.iface
    }

    pub fn host(&self) -> &Hostname {
        &self.host
    }

    pub fn zone(&self) -> InterfaceZone {
        self.zone
    }

    pub fn inet(&self) -> InetMethod {
        self.inet
    }

    pub fn address(&self) -> Option<&IpAddressWithCidr> {
        self.address.as_ref()
    }

    pub fn netmask(&self) -> Option<Ipv4Addr> {
        self.netmask
    }

    pub fn gateway(&self) -> Option<IpAddr> {
        self.gateway
    }

    pub fn mac(&self) -> Option<&MacAddress> {
        self.mac.as_ref()
    }

    /// Stanza for the machine configuring its own interface
    pub fn server_stanza(&self) -> String {
        self.render_stanza(true)
    }

    /// Stanza for a router, which is itself the gateway of its LAN
    /// subnets and so never routes LAN traffic onward via a gateway line
    pub fn router_stanza(&self) -> String {
        self.render_stanza(self.zone == InterfaceZone::Wan)
    }

    fn render_stanza(&self, with_gateway: bool) -> String {
        let mut stanza = String::new();

        if let Some(comment) = &self.comment {
            let _ = writeln!(stanza, "# {}", comment);
        }

        let family = match &self.address {
            Some(addr) if !addr.is_ipv4() => "inet6",
            _ => "inet",
        };
        let _ = write!(stanza, "iface {} {} {}", self.iface, family, self.inet.as_str());

        if self.inet == InetMethod::Static {
            if let Some(addr) = &self.address {
                match (addr.is_ipv4(), addr.prefix_length()) {
                    (false, Some(prefix)) => {
                        let _ = write!(stanza, "\n\taddress {}\n\tnetmask {}", addr.address(), prefix);
                    }
                    _ => {
                        let _ = write!(stanza, "\n\taddress {}", addr.address());
                    }
                }
            }
            if let Some(mask) = self.netmask {
                let _ = write!(stanza, "\n\tnetmask {}", mask);
            }
            if let Some(broadcast) = self.broadcast {
                let _ = write!(stanza, "\n\tbroadcast {}", broadcast);
            }
            if with_gateway {
                if let Some(gateway) = self.gateway {
                    let _ = write!(stanza, "\n\tgateway {}", gateway);
                }
            }
        }

        if let Some(mac) = &self.mac {
            let _ = write!(stanza, "\n\thwaddress ether {}", mac);
        }

        stanza
    }
}

fn validate_iface_name(iface: &str) -> ModelResult<()> {
    let invalid = |reason: &str| ModelError::InvalidInterface {
        iface: iface.to_string(),
        reason: reason.to_string(),
    };

    if iface.is_empty() {
        return Err(invalid("name is empty"));
    }
    if iface.len() > NetworkInterfaceRecord::MAX_NAME_LENGTH {
        return Err(invalid("name is longer than 15 bytes"));
    }
    if !iface
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | ':' | '@'))
    {
        return Err(invalid("name contains characters outside [A-Za-z0-9._:@-]"));
    }

    Ok(())
}

fn parse_optional<T, E>(
    text: Option<&str>,
    parse: impl Fn(&str) -> Result<T, E>,
) -> ModelResult<Option<T>>
where
    ModelError: From<E>,
{
    match text.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => Ok(Some(parse(text)?)),
    }
}
