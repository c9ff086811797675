// Copyright (c) 2025 - Cowboy AI, Inc.
//! Machine Domain Models
//!
//! Validated records describing a network of machines: routers, servers,
//! hypervisor-hosted services and their users. Every record is built from a
//! raw declaration in one step and either comes out fully valid or not at all.
//!
//! # Value Objects with Invariants
//!
//! - [`Hostname`] - DNS-validated hostnames (RFC 1123)
//! - [`IpAddressWithCidr`] - IPv4/IPv6 with optional CIDR prefix
//! - [`MacAddress`] - 48-bit MAC address validation
//! - [`HostPattern`] - host plus port list used by firewall rules
//! - [`EmailAddress`] - alerting contact address
//!
//! # Records
//!
//! - [`MachineRecord`] - DNS identity, interfaces and firewall allow-lists
//! - [`ServiceRecord`] - a machine placed on a hypervisor, with disks
//! - [`NetworkInterfaceRecord`] - one interface and its `interfaces(5)` stanza
//! - [`DiskRecord`] - virtual disk or install medium
//! - [`UserRecord`] - a network user

pub mod address;
pub mod disk;
pub mod firewall;
pub mod host_pattern;
pub mod hostname;
pub mod interface;
pub mod machine;
pub mod network;
pub mod role;
pub mod service;
pub mod user;

// Re-export value objects
pub use address::{AddressResolver, EmailAddress};
pub use host_pattern::{HostPattern, PatternHost};
pub use hostname::{Hostname, HostnameError};
pub use network::{parse_netmask, IpAddressWithCidr, MacAddress, NetworkError};
pub use role::MachineRole;

// Re-export records
pub use disk::{DiskFormat, DiskOrigin, DiskRecord, Medium};
pub use firewall::{FirewallPolicy, FirewallPolicyAggregator, PatternSet, Protocol};
pub use interface::{InetMethod, InterfaceZone, NetworkInterfaceRecord};
pub use machine::{FrozenMachine, MachineRecord};
pub use service::{
    FrozenService, HypervisorPlacement, ServiceRecord, BOOT_DISK, DATA_DISK, INSTALL_DISK,
};
pub use user::UserRecord;
