// Copyright (c) 2025 - Cowboy AI, Inc.
//! Hypervisor disk provisioning
//!
//! [`ServiceProvisioner::ensure_disks`] completes a service's disk set:
//! declared disks receive their on-hypervisor path and a size, and the
//! `boot`, `data` and `debian` disks are synthesized when missing.
//!
//! Layout under the hypervisor base directory:
//!
//! ```text
//! <base>/disks/<disk>/<service>/<disk>.<ext>   persistent disks
//! <base>/isos/<service>/<disk>.iso             other install media
//! <base>/isos/<service>/<service>.iso          debian medium
//! ```
//!
//! A missing base directory is fatal. A missing default size is not: the
//! disk gets the configured fallback size and the failure is reported in
//! the returned [`ProvisioningReport`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::ProvisionerConfig;
use crate::domain::{
    DiskOrigin, DiskRecord, Medium, ServiceRecord, BOOT_DISK, DATA_DISK, INSTALL_DISK,
};
use crate::errors::{ModelError, ModelResult};

/// Source of per-hypervisor defaults
///
/// Sizes are in MiB.
pub trait HypervisorDefaults {
    /// Directory all of a hypervisor's disks and images live under
    fn base_path(&self, hypervisor: &str) -> ModelResult<PathBuf>;

    fn boot_disk_size(&self, hypervisor: &str, service: &str) -> ModelResult<u64>;

    fn data_disk_size(&self, hypervisor: &str, service: &str) -> ModelResult<u64>;
}

/// Per-service size overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSizes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_disk_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_disk_size: Option<u64>,
}

/// Defaults for one hypervisor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypervisorEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<PathBuf>,
    #[serde(flatten)]
    pub sizes: DiskSizes,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub services: IndexMap<String, DiskSizes>,
}

impl HypervisorEntry {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
            ..Default::default()
        }
    }

    pub fn with_sizes(mut self, boot: u64, data: u64) -> Self {
        self.sizes = DiskSizes {
            boot_disk_size: Some(boot),
            data_disk_size: Some(data),
        };
        self
    }

    pub fn with_service_sizes(mut self, service: impl Into<String>, sizes: DiskSizes) -> Self {
        self.services.insert(service.into(), sizes);
        self
    }
}

/// [`HypervisorDefaults`] backed by a declaration
///
/// ```json
/// {
///   "hv1": {
///     "base": "/srv/thornsec",
///     "boot_disk_size": 20,
///     "data_disk_size": 100,
///     "services": { "db": { "data_disk_size": 500 } }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HypervisorCatalog {
    hypervisors: IndexMap<String, HypervisorEntry>,
}

impl HypervisorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_hypervisor(mut self, label: impl Into<String>, entry: HypervisorEntry) -> Self {
        self.insert(label, entry);
        self
    }

    pub fn insert(&mut self, label: impl Into<String>, entry: HypervisorEntry) {
        self.hypervisors.insert(label.into(), entry);
    }

    pub fn get(&self, label: &str) -> Option<&HypervisorEntry> {
        self.hypervisors.get(label)
    }

    fn size(
        &self,
        hypervisor: &str,
        service: &str,
        setting: &str,
        pick: impl Fn(&DiskSizes) -> Option<u64>,
    ) -> ModelResult<u64> {
        let entry = self.hypervisors.get(hypervisor);
        entry
            .and_then(|e| e.services.get(service))
            .and_then(&pick)
            .or_else(|| entry.and_then(|e| pick(&e.sizes)))
            .ok_or_else(|| missing(hypervisor, setting))
    }
}

impl HypervisorDefaults for HypervisorCatalog {
    fn base_path(&self, hypervisor: &str) -> ModelResult<PathBuf> {
        self.hypervisors
            .get(hypervisor)
            .and_then(|e| e.base.clone())
            .ok_or_else(|| missing(hypervisor, "base"))
    }

    fn boot_disk_size(&self, hypervisor: &str, service: &str) -> ModelResult<u64> {
        self.size(hypervisor, service, "boot_disk_size", |s| s.boot_disk_size)
    }

    fn data_disk_size(&self, hypervisor: &str, service: &str) -> ModelResult<u64> {
        self.size(hypervisor, service, "data_disk_size", |s| s.data_disk_size)
    }
}

fn missing(hypervisor: &str, setting: &str) -> ModelError {
    ModelError::MissingHypervisorDefault {
        hypervisor: hypervisor.to_string(),
        setting: setting.to_string(),
    }
}

/// A disk whose default could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskWarning {
    pub label: String,
    pub error: ModelError,
    /// Size the disk received instead
    pub fallback_size: u64,
}

/// Outcome of one [`ServiceProvisioner::ensure_disks`] run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningReport {
    pub service: String,
    /// Labels of disks synthesized by this run
    pub generated: Vec<String>,
    pub warnings: Vec<DiskWarning>,
}

impl ProvisioningReport {
    fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            generated: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// No disk needed a fallback size
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SizeKind {
    Boot,
    Data,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceProvisioner {
    config: ProvisionerConfig,
}

impl ServiceProvisioner {
    pub fn new(config: ProvisionerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProvisionerConfig {
        &self.config
    }

    /// Complete the disk set of `service`
    ///
    /// Running it again on the result changes nothing.
    pub fn ensure_disks<D>(
        &self,
        service: &mut ServiceRecord,
        defaults: &D,
    ) -> ModelResult<ProvisioningReport>
    where
        D: HypervisorDefaults + ?Sized,
    {
        let name = service.label().to_string();
        let hypervisor = service.hypervisor().to_string();
        let base = defaults.base_path(&hypervisor)?;
        let mut report = ProvisioningReport::new(name.as_str());

        let sizer = Sizer {
            config: &self.config,
            defaults,
            hypervisor: &hypervisor,
            service: &name,
        };

        for disk in service.disks_mut().values_mut() {
            if disk.origin() == DiskOrigin::Generated {
                continue;
            }

            match disk.medium() {
                Medium::Disk => {
                    let format = disk.format().unwrap_or(self.config.default_format);
                    disk.set_format(format);
                    disk.set_path(disk_path(&base, disk.label(), &name, format.extension()));

                    if disk.size().is_none() {
                        let kind = if disk.label() == BOOT_DISK {
                            SizeKind::Boot
                        } else {
                            SizeKind::Data
                        };
                        let size = sizer.resolve(kind, disk.label(), &mut report);
                        disk.set_size(size);
                    }
                }
                Medium::Dvd => {
                    if disk.path().is_none() {
                        let stem = if disk.label() == INSTALL_DISK {
                            name.as_str()
                        } else {
                            disk.label()
                        };
                        let path = iso_path(&base, &name, stem);
                        disk.set_path(path);
                    }
                    // Install media always carry the sentinel size
                    disk.set_size(self.config.dvd_sentinel_size);
                }
            }

            debug!("Resolved disk {} of {}", disk.label(), name);
        }

        if service.disk(BOOT_DISK).is_none() {
            let size = sizer.resolve(SizeKind::Boot, BOOT_DISK, &mut report);
            self.synthesize(
                service,
                &mut report,
                DiskRecord::generated_disk(
                    BOOT_DISK,
                    self.config.default_format,
                    disk_path(&base, BOOT_DISK, &name, self.config.default_format.extension()),
                    size,
                    "autogenerated boot disk",
                ),
            );
        }

        if service.disk(DATA_DISK).is_none() {
            let size = sizer.resolve(SizeKind::Data, DATA_DISK, &mut report);
            self.synthesize(
                service,
                &mut report,
                DiskRecord::generated_disk(
                    DATA_DISK,
                    self.config.default_format,
                    disk_path(&base, DATA_DISK, &name, self.config.default_format.extension()),
                    size,
                    "autogenerated data disk",
                ),
            );
        }

        if service.disk(INSTALL_DISK).is_none() {
            self.synthesize(
                service,
                &mut report,
                DiskRecord::generated_dvd(
                    INSTALL_DISK,
                    iso_path(&base, &name, &name),
                    self.config.dvd_sentinel_size,
                    "autogenerated iso disk",
                ),
            );
        }

        info!(
            "Provisioned {} on {}: {} disks, {} generated, {} warnings",
            name,
            hypervisor,
            service.disks().len(),
            report.generated.len(),
            report.warnings.len()
        );

        Ok(report)
    }

    fn synthesize(&self, service: &mut ServiceRecord, report: &mut ProvisioningReport, disk: DiskRecord) {
        let label = disk.label().to_string();
        if service.add_disk(disk) {
            debug!("Generated {} disk for {}", label, service.label());
            report.generated.push(label);
        }
    }
}

struct Sizer<'a, D: ?Sized> {
    config: &'a ProvisionerConfig,
    defaults: &'a D,
    hypervisor: &'a str,
    service: &'a str,
}

impl<D: HypervisorDefaults + ?Sized> Sizer<'_, D> {
    fn resolve(&self, kind: SizeKind, label: &str, report: &mut ProvisioningReport) -> u64 {
        let (result, fallback) = match kind {
            SizeKind::Boot => (
                self.defaults.boot_disk_size(self.hypervisor, self.service),
                self.config.fallback_boot_size,
            ),
            SizeKind::Data => (
                self.defaults.data_disk_size(self.hypervisor, self.service),
                self.config.fallback_data_size,
            ),
        };

        match result {
            Ok(size) => size,
            Err(error) => {
                warn!(
                    "No default size for disk {} of {}: {}; using {} MiB",
                    label, self.service, error, fallback
                );
                report.warnings.push(DiskWarning {
                    label: label.to_string(),
                    error,
                    fallback_size: fallback,
                });
                fallback
            }
        }
    }
}

fn disk_path(base: &Path, disk: &str, service: &str, extension: &str) -> PathBuf {
    base.join("disks")
        .join(disk)
        .join(service)
        .join(format!("{}.{}", disk, extension))
}

fn iso_path(base: &Path, service: &str, file_stem: &str) -> PathBuf {
    base.join("isos").join(service).join(format!("{}.iso", file_stem))
}

/// [`ServiceProvisioner::ensure_disks`] with the default configuration
pub fn ensure_disks<D>(service: &mut ServiceRecord, defaults: &D) -> ModelResult<ProvisioningReport>
where
    D: HypervisorDefaults + ?Sized,
{
    ServiceProvisioner::default().ensure_disks(service, defaults)
}
