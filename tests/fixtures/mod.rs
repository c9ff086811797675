// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-machine-config
//!
//! Deterministic declarations and hypervisor catalogs shared by the
//! scenario and property suites. Tests build records from these fixtures
//! instead of spelling out JSON inline.

#![allow(dead_code)]

use std::sync::Once;

use cim_machine_config::{
    HypervisorCatalog, HypervisorEntry, MachineDeclaration, MachineRecord, NetworkDeclaration,
    ServiceDeclaration, ServiceRecord,
};

pub const HYPERVISOR: &str = "hv1";
pub const HYPERVISOR_BASE: &str = "/srv/hv1";
pub const BOOT_SIZE: u64 = 20;
pub const DATA_SIZE: u64 = 100;

static TRACING: Once = Once::new();

/// Install a test subscriber once; filter with `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// `web1.example` with a single bare LAN interface
pub fn web1_declaration() -> MachineDeclaration {
    MachineDeclaration::from_json(r#"{"fqdn": "web1.example", "lan": [{"iface": "eth0"}]}"#)
        .expect("Invalid web1 fixture")
}

pub fn web1() -> MachineRecord {
    MachineRecord::from_declaration("web1", &web1_declaration()).expect("Invalid web1 record")
}

/// A router with a static LAN and a DHCP uplink
pub fn router_declaration() -> MachineDeclaration {
    MachineDeclaration::from_json(
        r#"{
            "fqdn": "router.example",
            "lan": [{"iface": "lan0", "address": "10.0.0.1/24", "gateway": "10.0.0.254",
                     "comment": "office"}],
            "wan": [{"iface": "wan0", "address": "198.51.100.2/30", "gateway": "198.51.100.1"}]
        }"#,
    )
    .expect("Invalid router fixture")
}

pub fn router() -> MachineRecord {
    MachineRecord::from_declaration("router", &router_declaration())
        .expect("Invalid router record")
}

/// `svc1` on `hv1` with no declared disks
pub fn svc1() -> ServiceRecord {
    ServiceRecord::from_declaration(
        "svc1",
        &ServiceDeclaration::new("svc1.example", HYPERVISOR),
    )
    .expect("Invalid svc1 record")
}

/// `hv1` with boot 20 and data 100
pub fn catalog() -> HypervisorCatalog {
    HypervisorCatalog::new().with_hypervisor(
        HYPERVISOR,
        HypervisorEntry::new(HYPERVISOR_BASE).with_sizes(BOOT_SIZE, DATA_SIZE),
    )
}

/// A small network: one router, one server, one service, one user
pub fn network_declaration() -> NetworkDeclaration {
    NetworkDeclaration::from_json(
        r#"{
            "routers": ["router"],
            "servers": {
                "router": {
                    "fqdn": "router.example",
                    "lan": [{"iface": "lan0", "address": "10.0.0.1/24"}],
                    "wan": [{"iface": "wan0"}]
                },
                "web1": {
                    "fqdn": "web1.example",
                    "lan": [{"iface": "eth0"}],
                    "email": "ops@example.org"
                }
            },
            "services": {
                "svc1": {
                    "fqdn": "svc1.example",
                    "hypervisor": "hv1",
                    "lan": [{"iface": "eth0"}],
                    "disks": {"logs": {"size": 5}}
                }
            },
            "users": {
                "alice": {"username": "alice", "wireguard": {"ip": "172.16.0.2/32"}}
            }
        }"#,
    )
    .expect("Invalid network fixture")
}
