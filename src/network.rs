// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Model
//!
//! Owns every record built from a [`NetworkDeclaration`] and drives the two
//! phases of their life:
//!
//! 1. **Accumulating**: records are built, capabilities are activated and
//!    services are provisioned. All of this needs `&mut NetworkModel`.
//! 2. **Frozen**: [`NetworkModel::freeze`] moves the model behind an `Arc`.
//!    The resulting [`FrozenNetwork`] is cheap to clone and can be read from
//!    any number of generator threads.

use indexmap::{IndexMap, IndexSet};
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, info};

use crate::capability::Capability;
use crate::compiler::InterfaceCompiler;
use crate::config::CompilerConfig;
use crate::declaration::NetworkDeclaration;
use crate::domain::{
    FirewallPolicyAggregator, HypervisorPlacement, MachineRecord, MachineRole, ServiceRecord,
    UserRecord,
};
use crate::errors::{ModelError, ModelResult};
use crate::provisioner::{HypervisorDefaults, ProvisioningReport, ServiceProvisioner};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkModel {
    routers: IndexSet<String>,
    machines: IndexMap<String, MachineRecord>,
    services: IndexMap<String, ServiceRecord>,
    users: IndexMap<String, UserRecord>,
}

impl NetworkModel {
    /// Build every record, failing on the first invalid one
    pub fn from_declaration(decl: &NetworkDeclaration) -> ModelResult<Self> {
        let mut model = Self::default();

        for (label, machine) in &decl.servers {
            model
                .machines
                .insert(label.clone(), MachineRecord::from_declaration(label.as_str(), machine)?);
        }

        for (label, service) in &decl.services {
            if model.machines.contains_key(label) {
                return Err(ModelError::Declaration(format!(
                    "{} is declared both as a server and as a service",
                    label
                )));
            }
            model
                .services
                .insert(label.clone(), ServiceRecord::from_declaration(label.as_str(), service)?);
        }

        for label in &decl.routers {
            if !model.contains(label) {
                return Err(ModelError::UnknownMachine(label.clone()));
            }
            model.routers.insert(label.clone());
        }

        for (label, user) in &decl.users {
            model
                .users
                .insert(label.clone(), UserRecord::from_declaration(label.as_str(), user)?);
        }

        info!(
            "Built network model: {} servers, {} services, {} routers, {} users",
            model.machines.len(),
            model.services.len(),
            model.routers.len(),
            model.users.len()
        );

        Ok(model)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.machines.contains_key(label) || self.services.contains_key(label)
    }

    /// Machine record of a server or a service
    pub fn machine(&self, label: &str) -> Option<&MachineRecord> {
        self.machines
            .get(label)
            .or_else(|| self.services.get(label).map(ServiceRecord::machine))
    }

    /// Servers followed by services, in declaration order
    pub fn machines(&self) -> impl Iterator<Item = &MachineRecord> {
        self.machines
            .values()
            .chain(self.services.values().map(ServiceRecord::machine))
    }

    pub fn service(&self, label: &str) -> Option<&ServiceRecord> {
        self.services.get(label)
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceRecord> {
        self.services.values()
    }

    pub fn user(&self, label: &str) -> Option<&UserRecord> {
        self.users.get(label)
    }

    pub fn users(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.values()
    }

    pub fn routers(&self) -> impl Iterator<Item = &str> {
        self.routers.iter().map(String::as_str)
    }

    pub fn role_of(&self, label: &str) -> ModelResult<MachineRole> {
        if self.routers.contains(label) {
            Ok(MachineRole::Router)
        } else if self.contains(label) {
            Ok(MachineRole::Server)
        } else {
            Err(ModelError::UnknownMachine(label.to_string()))
        }
    }

    fn aggregator_mut(&mut self, label: &str) -> ModelResult<&mut dyn FirewallPolicyAggregator> {
        if let Some(machine) = self.machines.get_mut(label) {
            return Ok(machine);
        }
        match self.services.get_mut(label) {
            Some(service) => Ok(service),
            None => Err(ModelError::UnknownMachine(label.to_string())),
        }
    }

    /// Apply a capability to one machine
    pub fn activate(&mut self, label: &str, capability: &dyn Capability) -> ModelResult<()> {
        let target = self.aggregator_mut(label)?;
        capability.apply_firewall(target)?;
        debug!("Activated {} on {}", capability.name(), label);
        Ok(())
    }

    /// Run [`ServiceProvisioner::ensure_disks`] for every service
    pub fn provision<D>(&mut self, defaults: &D) -> ModelResult<Vec<ProvisioningReport>>
    where
        D: HypervisorDefaults + ?Sized,
    {
        self.provision_with(&ServiceProvisioner::default(), defaults)
    }

    pub fn provision_with<D>(
        &mut self,
        provisioner: &ServiceProvisioner,
        defaults: &D,
    ) -> ModelResult<Vec<ProvisioningReport>>
    where
        D: HypervisorDefaults + ?Sized,
    {
        self.services
            .values_mut()
            .map(|service| provisioner.ensure_disks(service, defaults))
            .collect()
    }

    /// Compiler loaded with one machine's interfaces and its role
    pub fn compiler_for(&self, label: &str, config: CompilerConfig) -> ModelResult<InterfaceCompiler> {
        let machine = self
            .machine(label)
            .ok_or_else(|| ModelError::UnknownMachine(label.to_string()))?;

        let mut compiler = InterfaceCompiler::with_config(self.role_of(label)?, config);
        compiler.add_machine(machine);
        Ok(compiler)
    }

    pub fn persistent_config(&self, label: &str) -> ModelResult<String> {
        Ok(self
            .compiler_for(label, CompilerConfig::default())?
            .persistent_config())
    }

    pub fn placements(&self) -> Vec<HypervisorPlacement> {
        self.services.values().map(ServiceRecord::placement).collect()
    }

    /// End the accumulating phase
    pub fn freeze(self) -> FrozenNetwork {
        FrozenNetwork(Arc::new(self))
    }
}

/// Shared read-only view of a finished [`NetworkModel`]
#[derive(Debug, Clone)]
pub struct FrozenNetwork(Arc<NetworkModel>);

impl Deref for FrozenNetwork {
    type Target = NetworkModel;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
