// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declaration input schema
//!
//! These types mirror the raw per-machine declaration. Every collection is
//! an `Option`: a missing key deserializes to `None` and an explicit `[]`
//! to `Some(vec![])`, so the model can tell "nothing declared" from
//! "declared empty".

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::{DiskFormat, InetMethod, Medium};
use crate::errors::ModelResult;

/// One machine as declared
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineDeclaration {
    pub fqdn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lan: Option<Vec<InterfaceDeclaration>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wan: Option<Vec<InterfaceDeclaration>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnames: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listentcp: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listenudp: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egress: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub externalip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl MachineDeclaration {
    /// Minimal declaration carrying only an FQDN
    pub fn new(fqdn: impl Into<String>) -> Self {
        Self {
            fqdn: fqdn.into(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A network interface entry inside `lan[]` or `wan[]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDeclaration {
    pub iface: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inet: Option<InetMethod>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl InterfaceDeclaration {
    pub fn new(iface: impl Into<String>) -> Self {
        Self {
            iface: iface.into(),
            ..Default::default()
        }
    }
}

/// A machine hosted on a hypervisor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDeclaration {
    #[serde(flatten)]
    pub machine: MachineDeclaration,

    pub hypervisor: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disks: Option<IndexMap<String, DiskDeclaration>>,
}

impl ServiceDeclaration {
    pub fn new(fqdn: impl Into<String>, hypervisor: impl Into<String>) -> Self {
        Self {
            machine: MachineDeclaration::new(fqdn),
            hypervisor: hypervisor.into(),
            disks: None,
        }
    }

    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One entry of a service's `disks{}` mapping; the label is the map key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<Medium>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DiskFormat>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A network user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaultpw: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wireguard: Option<WireGuardDeclaration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireGuardDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

/// The whole network snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDeclaration {
    /// Labels of machines acting as routers
    #[serde(default)]
    pub routers: Vec<String>,

    #[serde(default)]
    pub servers: IndexMap<String, MachineDeclaration>,

    #[serde(default)]
    pub services: IndexMap<String, ServiceDeclaration>,

    #[serde(default)]
    pub users: IndexMap<String, UserDeclaration>,
}

impl NetworkDeclaration {
    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
