// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Record
//!
//! A service is a machine that runs on a hypervisor. On top of the machine
//! record it carries the hypervisor label and an insertion-ordered set of
//! disks keyed by label.

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

use super::firewall::sealed::PolicyStore;
use super::{DiskRecord, FirewallPolicy, FirewallPolicyAggregator, MachineRecord};
use crate::declaration::ServiceDeclaration;
use crate::errors::{ModelError, ModelResult};

/// Read-only, shareable service record
pub type FrozenService = Arc<ServiceRecord>;

/// Disk labels every provisioned service carries
pub const BOOT_DISK: &str = "boot";
pub const DATA_DISK: &str = "data";
pub const INSTALL_DISK: &str = "debian";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRecord {
    machine: MachineRecord,
    hypervisor: String,
    disks: IndexMap<String, DiskRecord>,
}

/// Where a service lives and what storage it needs
///
/// This is the hand-off value for hypervisor provisioning tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HypervisorPlacement {
    pub service: String,
    pub hypervisor: String,
    pub disks: Vec<DiskRecord>,
}

impl ServiceRecord {
    pub fn from_declaration(label: impl Into<String>, decl: &ServiceDeclaration) -> ModelResult<Self> {
        let machine = MachineRecord::from_declaration(label, &decl.machine)?;

        let hypervisor = decl.hypervisor.trim().to_string();
        if hypervisor.is_empty() {
            return Err(ModelError::Declaration(format!(
                "{}: service has no hypervisor",
                machine.label()
            )));
        }

        let mut disks = IndexMap::new();
        for (label, disk) in decl.disks.iter().flatten() {
            disks.insert(label.clone(), DiskRecord::from_declaration(label.as_str(), disk)?);
        }

        Ok(Self {
            machine,
            hypervisor,
            disks,
        })
    }

    pub fn label(&self) -> &str {
        self.machine.label()
    }

    pub fn machine(&self) -> &MachineRecord {
        &self.machine
    }

    pub fn hypervisor(&self) -> &str {
        &self.hypervisor
    }

    pub fn disks(&self) -> &IndexMap<String, DiskRecord> {
        &self.disks
    }

    pub fn disk(&self, label: &str) -> Option<&DiskRecord> {
        self.disks.get(label)
    }

    pub(crate) fn disks_mut(&mut self) -> &mut IndexMap<String, DiskRecord> {
        &mut self.disks
    }

    /// Add a disk unless one with the same label exists; returns whether
    /// it was added
    pub fn add_disk(&mut self, disk: DiskRecord) -> bool {
        if self.disks.contains_key(disk.label()) {
            return false;
        }
        self.disks.insert(disk.label().to_string(), disk);
        true
    }

    pub fn placement(&self) -> HypervisorPlacement {
        HypervisorPlacement {
            service: self.label().to_string(),
            hypervisor: self.hypervisor.clone(),
            disks: self.disks.values().cloned().collect(),
        }
    }

    /// End the accumulating phase
    pub fn freeze(self) -> FrozenService {
        Arc::new(self)
    }
}

impl PolicyStore for ServiceRecord {
    fn firewall_mut(&mut self) -> &mut FirewallPolicy {
        self.machine.firewall_mut()
    }
}

impl FirewallPolicyAggregator for ServiceRecord {
    fn policy_owner(&self) -> &str {
        self.machine.policy_owner()
    }

    fn firewall(&self) -> &FirewallPolicy {
        self.machine.firewall()
    }
}
