// Copyright (c) 2025 - Cowboy AI, Inc.
//! Machine configuration model for the Composable Information Machine
//!
//! Turns declarative machine, service and user declarations into validated
//! records, renders persistent network interface configuration and
//! completes the disk layout of hypervisor-hosted services.
//!
//! # Example
//!
//! ```
//! use cim_machine_config::{generate_persistent_config, MachineDeclaration, MachineRecord, MachineRole};
//!
//! let decl = MachineDeclaration::from_json(r#"{"fqdn": "web1.example", "lan": [{"iface": "eth0"}]}"#)?;
//! let web1 = MachineRecord::from_declaration("web1", &decl)?;
//!
//! let config = generate_persistent_config([&web1], MachineRole::Server);
//! assert!(config.contains("auto lo eth0"));
//! # Ok::<(), cim_machine_config::ModelError>(())
//! ```

pub mod capability;
pub mod compiler;
pub mod config;
pub mod declaration;
pub mod domain;
pub mod errors;
pub mod network;
pub mod provisioner;
pub mod unit;

// Re-export commonly used types
pub use capability::{Capability, OutboundMail};
pub use compiler::{generate_persistent_config, InterfaceCompiler};
pub use config::{CompilerConfig, ProvisionerConfig};
pub use declaration::{
    DiskDeclaration, InterfaceDeclaration, MachineDeclaration, NetworkDeclaration,
    ServiceDeclaration, UserDeclaration, WireGuardDeclaration,
};
pub use domain::{
    AddressResolver, DiskFormat, DiskRecord, EmailAddress, FirewallPolicyAggregator, HostPattern,
    Hostname, MachineRecord, MachineRole, Medium, NetworkInterfaceRecord, Protocol, ServiceRecord,
    UserRecord,
};
pub use errors::{ModelError, ModelResult};
pub use network::{FrozenNetwork, NetworkModel};
pub use provisioner::{
    ensure_disks, HypervisorCatalog, HypervisorDefaults, HypervisorEntry, ProvisioningReport,
    ServiceProvisioner,
};
pub use unit::ConfigUnit;
