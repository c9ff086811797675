// Copyright (c) 2025 - Cowboy AI, Inc.
//! Disk provisioning for hypervisor-hosted services

use anyhow::Result;
use pretty_assertions::assert_eq;
use std::path::Path;

use cim_machine_config::domain::DiskOrigin;
use cim_machine_config::{
    ensure_disks, DiskFormat, HypervisorCatalog, Medium, ModelError, NetworkModel,
};

use crate::fixtures::*;

#[test]
fn test_service_without_disks_gets_defaults() -> Result<()> {
    init_tracing();
    let mut svc = svc1();

    let report = ensure_disks(&mut svc, &catalog())?;
    assert!(report.is_clean());
    assert_eq!(report.generated, vec!["boot", "data", "debian"]);

    let boot = svc.disk("boot").ok_or_else(|| anyhow::anyhow!("boot missing"))?;
    assert_eq!(boot.medium(), Medium::Disk);
    assert_eq!(boot.format(), Some(DiskFormat::Vmdk));
    assert_eq!(boot.size(), Some(BOOT_SIZE));
    assert_eq!(boot.path(), Some(Path::new("/srv/hv1/disks/boot/svc1/boot.vmdk")));
    assert_eq!(boot.description(), Some("autogenerated boot disk"));
    assert_eq!(boot.origin(), DiskOrigin::Generated);

    let data = svc.disk("data").ok_or_else(|| anyhow::anyhow!("data missing"))?;
    assert_eq!(data.size(), Some(DATA_SIZE));
    assert_eq!(data.path(), Some(Path::new("/srv/hv1/disks/data/svc1/data.vmdk")));

    let debian = svc.disk("debian").ok_or_else(|| anyhow::anyhow!("debian missing"))?;
    assert_eq!(debian.medium(), Medium::Dvd);
    assert_eq!(debian.format(), None);
    assert_eq!(debian.size(), Some(666));
    assert_eq!(debian.path(), Some(Path::new("/srv/hv1/isos/svc1/svc1.iso")));
    Ok(())
}

#[test]
fn test_ensure_disks_is_idempotent() -> Result<()> {
    let mut svc = svc1();
    ensure_disks(&mut svc, &catalog())?;
    let once = svc.disks().clone();

    let report = ensure_disks(&mut svc, &catalog())?;
    assert!(report.generated.is_empty());
    assert_eq!(svc.disks(), &once);
    Ok(())
}

#[test]
fn test_unknown_hypervisor_is_fatal() {
    let mut svc = svc1();
    assert!(matches!(
        ensure_disks(&mut svc, &HypervisorCatalog::new()),
        Err(ModelError::MissingHypervisorDefault { .. })
    ));
    assert!(svc.disks().is_empty());
}

#[test]
fn test_network_provisioning_and_placement() -> Result<()> {
    let mut model = NetworkModel::from_declaration(&network_declaration())?;
    let reports = model.provision(&catalog())?;
    assert_eq!(reports.len(), 1);

    let placements = model.freeze().placements();
    let labels: Vec<&str> = placements[0].disks.iter().map(|d| d.label()).collect();
    assert_eq!(labels, vec!["logs", "boot", "data", "debian"]);
    assert_eq!(placements[0].disks[0].size(), Some(5));

    let json = serde_json::to_value(&placements[0])?;
    assert_eq!(json["hypervisor"], "hv1");
    assert_eq!(json["service"], "svc1");
    Ok(())
}
