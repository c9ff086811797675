// Copyright (c) 2025 - Cowboy AI, Inc.
//! Machine Record
//!
//! The validated model of one machine on the network: its DNS identity,
//! interfaces, firewall allow-lists and alerting contact.
//!
//! # Lifecycle
//!
//! A record is built once by [`MachineRecord::from_declaration`], which
//! either returns a fully populated record or an error. Until it is frozen
//! the record is in its accumulating phase and capabilities may append
//! firewall rules through [`FirewallPolicyAggregator`]. [`MachineRecord::freeze`]
//! ends that phase and hands out a shared, read-only [`FrozenMachine`] that
//! generators can read from several threads at once.

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::debug;

use super::firewall::{sealed::PolicyStore, FirewallDeclaration};
use super::{
    AddressResolver, EmailAddress, FirewallPolicy, FirewallPolicyAggregator, Hostname,
    InterfaceZone, IpAddressWithCidr, NetworkInterfaceRecord,
};
use crate::declaration::{InterfaceDeclaration, MachineDeclaration};
use crate::errors::{ModelError, ModelResult};

/// Read-only, shareable machine record
pub type FrozenMachine = Arc<MachineRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineRecord {
    label: String,
    fqdn: Hostname,

    #[serde(skip_serializing_if = "Option::is_none")]
    cnames: Option<BTreeSet<Hostname>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    lan_interfaces: Option<Vec<NetworkInterfaceRecord>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    wan_interfaces: Option<Vec<NetworkInterfaceRecord>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    external_ip: Option<IpAddressWithCidr>,

    #[serde(skip_serializing_if = "Option::is_none")]
    throttled: Option<bool>,

    firewall: FirewallPolicy,

    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<EmailAddress>,
}

impl MachineRecord {
    /// Build a record from its declaration, failing fast on the first
    /// invalid field
    pub fn from_declaration(label: impl Into<String>, decl: &MachineDeclaration) -> ModelResult<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(ModelError::Declaration("machine label is empty".to_string()));
        }

        let fqdn = AddressResolver::resolve_hostname(&decl.fqdn)?;

        let lan_interfaces = read_interfaces(&fqdn, InterfaceZone::Lan, decl.lan.as_deref())?;
        if matches!(&lan_interfaces, Some(lan) if lan.is_empty()) {
            return Err(ModelError::Declaration(format!(
                "{}: lan is declared but lists no interfaces",
                label
            )));
        }
        let wan_interfaces = read_interfaces(&fqdn, InterfaceZone::Wan, decl.wan.as_deref())?;
        check_unique_names(&fqdn, &lan_interfaces, &wan_interfaces)?;

        let cnames = decl
            .cnames
            .as_ref()
            .map(|cnames| {
                cnames
                    .iter()
                    .map(|cname| AddressResolver::resolve_hostname(cname))
                    .collect::<ModelResult<BTreeSet<_>>>()
            })
            .transpose()?;

        let firewall = FirewallPolicy::from_declaration(FirewallDeclaration {
            listen_tcp: decl.listentcp.as_deref(),
            listen_udp: decl.listenudp.as_deref(),
            forward: decl.forward.as_deref(),
            ingress: decl.ingress.as_deref(),
            egress: decl.egress.as_deref(),
        })?;

        let email = decl
            .email
            .as_deref()
            .map(AddressResolver::resolve_email)
            .transpose()?;

        let record = Self {
            external_ip: AddressResolver::resolve_ip(decl.externalip.as_deref())?,
            throttled: decl.throttle,
            label,
            fqdn,
            cnames,
            lan_interfaces,
            wan_interfaces,
            firewall,
            email,
        };

        debug!(
            "Built machine record {} ({}) with {} interfaces",
            record.label,
            record.fqdn,
            record.interfaces().count()
        );

        Ok(record)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn fqdn(&self) -> &Hostname {
        &self.fqdn
    }

    pub fn cnames(&self) -> Option<&BTreeSet<Hostname>> {
        self.cnames.as_ref()
    }

    pub fn lan_interfaces(&self) -> Option<&[NetworkInterfaceRecord]> {
        self.lan_interfaces.as_deref()
    }

    pub fn wan_interfaces(&self) -> Option<&[NetworkInterfaceRecord]> {
        self.wan_interfaces.as_deref()
    }

    /// LAN interfaces followed by WAN interfaces, in declaration order
    pub fn interfaces(&self) -> impl Iterator<Item = &NetworkInterfaceRecord> {
        self.lan_interfaces
            .iter()
            .flatten()
            .chain(self.wan_interfaces.iter().flatten())
    }

    pub fn external_ip(&self) -> Option<&IpAddressWithCidr> {
        self.external_ip.as_ref()
    }

    /// `None` when the declaration did not say
    pub fn is_throttled(&self) -> Option<bool> {
        self.throttled
    }

    pub fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// End the accumulating phase
    pub fn freeze(self) -> FrozenMachine {
        Arc::new(self)
    }
}

impl PolicyStore for MachineRecord {
    fn firewall_mut(&mut self) -> &mut FirewallPolicy {
        &mut self.firewall
    }
}

impl FirewallPolicyAggregator for MachineRecord {
    fn policy_owner(&self) -> &str {
        &self.label
    }

    fn firewall(&self) -> &FirewallPolicy {
        &self.firewall
    }
}

fn read_interfaces(
    fqdn: &Hostname,
    zone: InterfaceZone,
    decls: Option<&[InterfaceDeclaration]>,
) -> ModelResult<Option<Vec<NetworkInterfaceRecord>>> {
    decls
        .map(|decls| {
            decls
                .iter()
                .map(|decl| NetworkInterfaceRecord::from_declaration(fqdn, zone, decl))
                .collect()
        })
        .transpose()
}

fn check_unique_names(
    fqdn: &Hostname,
    lan: &Option<Vec<NetworkInterfaceRecord>>,
    wan: &Option<Vec<NetworkInterfaceRecord>>,
) -> ModelResult<()> {
    let mut seen = HashSet::new();
    for iface in lan.iter().flatten().chain(wan.iter().flatten()) {
        if !seen.insert(iface.iface()) {
            return Err(ModelError::DuplicateInterface {
                iface: iface.iface().to_string(),
                host: fqdn.to_string(),
            });
        }
    }
    Ok(())
}
