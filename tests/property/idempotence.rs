// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Idempotent Generators
//!
//! Rendering interface configuration and completing a disk set are both
//! expected to be fixed points: running them again on unchanged input
//! produces the same output.

use cim_machine_config::{
    ensure_disks, generate_persistent_config, DiskDeclaration, HypervisorCatalog,
    HypervisorEntry, InterfaceDeclaration, MachineDeclaration, MachineRecord, MachineRole,
    Medium, ServiceDeclaration, ServiceRecord,
};
use indexmap::IndexMap;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn iface_name() -> impl Strategy<Value = String> {
    "(eth|lan|wan|br)[0-9]{1,2}"
}

fn interface() -> impl Strategy<Value = InterfaceDeclaration> {
    (iface_name(), prop::option::of((1u8..=254, 8u8..=30))).prop_map(|(name, addr)| {
        InterfaceDeclaration {
            address: addr.map(|(host, prefix)| format!("10.0.0.{}/{}", host, prefix)),
            ..InterfaceDeclaration::new(name)
        }
    })
}

/// A machine with uniquely named interfaces
fn machine() -> impl Strategy<Value = MachineRecord> {
    prop::collection::vec(interface(), 0..6).prop_map(|ifaces| {
        let mut seen = std::collections::HashSet::new();
        let lan: Vec<_> = ifaces
            .into_iter()
            .filter(|i| seen.insert(i.iface.clone()))
            .collect();

        let decl = MachineDeclaration {
            lan: if lan.is_empty() { None } else { Some(lan) },
            ..MachineDeclaration::new("prop.example")
        };
        MachineRecord::from_declaration("prop", &decl).expect("Generated declaration is valid")
    })
}

fn role() -> impl Strategy<Value = MachineRole> {
    prop_oneof![Just(MachineRole::Router), Just(MachineRole::Server)]
}

fn disk() -> impl Strategy<Value = DiskDeclaration> {
    (any::<bool>(), prop::option::of(1u64..10_000)).prop_map(|(dvd, size)| DiskDeclaration {
        medium: Some(if dvd { Medium::Dvd } else { Medium::Disk }),
        size,
        ..Default::default()
    })
}

fn service() -> impl Strategy<Value = ServiceRecord> {
    prop::collection::vec(("(boot|data|debian|logs|scratch)", disk()), 0..5).prop_map(|disks| {
        let disks: IndexMap<String, DiskDeclaration> = disks.into_iter().collect();
        let decl = ServiceDeclaration {
            disks: Some(disks),
            ..ServiceDeclaration::new("svc.example", "hv1")
        };
        ServiceRecord::from_declaration("svc", &decl).expect("Generated declaration is valid")
    })
}

fn catalog() -> HypervisorCatalog {
    HypervisorCatalog::new()
        .with_hypervisor("hv1", HypervisorEntry::new("/srv/hv1").with_sizes(20, 100))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: Rendering is deterministic
    #[test]
    fn prop_rendering_is_deterministic(record in machine(), role in role()) {
        let first = generate_persistent_config([&record], role);
        let second = generate_persistent_config([&record], role);
        prop_assert_eq!(first, second);
    }

    /// Property: Every interface name appears on the auto line exactly once
    #[test]
    fn prop_auto_line_lists_every_interface(record in machine(), role in role()) {
        let config = generate_persistent_config([&record], role);
        let auto = config
            .lines()
            .find(|l| l.starts_with("auto lo"))
            .expect("auto line is always rendered");
        let names: Vec<&str> = auto.split_whitespace().skip(2).collect();
        let expected: Vec<&str> = record.interfaces().map(|i| i.iface()).collect();
        prop_assert_eq!(names, expected);
    }

    /// Property: Output ends with exactly one newline
    #[test]
    fn prop_single_trailing_newline(record in machine(), role in role()) {
        let config = generate_persistent_config([&record], role);
        prop_assert!(config.ends_with('\n'));
        prop_assert!(!config.ends_with("\n\n"));
    }

    /// Property: ensure_disks is a fixed point after the first run
    #[test]
    fn prop_ensure_disks_is_idempotent(mut svc in service()) {
        ensure_disks(&mut svc, &catalog()).expect("hv1 is known");
        let once = svc.clone();

        let report = ensure_disks(&mut svc, &catalog()).expect("hv1 is known");
        prop_assert!(report.generated.is_empty());
        prop_assert_eq!(svc, once);
    }

    /// Property: The standard disks are always present and fully resolved
    #[test]
    fn prop_standard_disks_present(mut svc in service()) {
        let declared = svc.disks().len();
        ensure_disks(&mut svc, &catalog()).expect("hv1 is known");

        for label in ["boot", "data", "debian"] {
            prop_assert!(svc.disk(label).is_some(), "{} missing", label);
        }
        prop_assert!(svc.disks().len() >= declared);
        for disk in svc.disks().values() {
            prop_assert!(disk.path().is_some());
            prop_assert!(disk.size().is_some());
            prop_assert_eq!(disk.format().is_some(), disk.medium() == Medium::Disk);
            if disk.medium() == Medium::Dvd {
                prop_assert_eq!(disk.size(), Some(666));
            }
        }
    }
}
