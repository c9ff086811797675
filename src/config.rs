// Copyright (c) 2025 - Cowboy AI, Inc.
//! Generator and provisioner configuration
//!
//! Both configs carry the conventional Debian values by default and can be
//! overridden from `CIM_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::DiskFormat;
use crate::errors::{ModelError, ModelResult};

/// Settings for rendering `/etc/network/interfaces`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// File the rendered configuration is persisted to
    pub interfaces_path: PathBuf,
    /// Glob sourced at the top of the file
    pub source_glob: String,
    /// `pre-up` commands attached to the loopback interface
    pub pre_up_hooks: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            interfaces_path: PathBuf::from("/etc/network/interfaces"),
            source_glob: "/etc/network/interfaces.d/*".to_string(),
            pre_up_hooks: vec![
                "/etc/ipsets/ipsets.up.sh | ipset -! restore".to_string(),
                "/etc/iptables/iptables.conf.sh | iptables-restore".to_string(),
            ],
        }
    }
}

impl CompilerConfig {
    /// Load configuration from environment variables
    ///
    /// `CIM_INTERFACES_PATH`, `CIM_INTERFACES_SOURCE` and
    /// `CIM_INTERFACES_PRE_UP` (hooks separated by `;`).
    pub fn from_env() -> ModelResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CompilerConfig::from_env`] with an explicit variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ModelResult<Self> {
        let defaults = Self::default();

        let interfaces_path = lookup("CIM_INTERFACES_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.interfaces_path);

        let source_glob = lookup("CIM_INTERFACES_SOURCE").unwrap_or(defaults.source_glob);

        let pre_up_hooks = match lookup("CIM_INTERFACES_PRE_UP") {
            Some(raw) => raw
                .split(';')
                .map(str::trim)
                .filter(|hook| !hook.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.pre_up_hooks,
        };

        if interfaces_path.as_os_str().is_empty() {
            return Err(ModelError::Configuration(
                "CIM_INTERFACES_PATH is empty".to_string(),
            ));
        }

        Ok(Self {
            interfaces_path,
            source_glob,
            pre_up_hooks,
        })
    }
}

/// Settings for disk provisioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionerConfig {
    /// Format given to persistent disks that do not declare one
    pub default_format: DiskFormat,
    /// Size recorded for install media, which have no meaningful size
    pub dvd_sentinel_size: u64,
    /// Boot disk size in MiB used when the hypervisor has no default
    pub fallback_boot_size: u64,
    /// Data disk size in MiB used when the hypervisor has no default
    pub fallback_data_size: u64,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            default_format: DiskFormat::Vmdk,
            dvd_sentinel_size: 666,
            fallback_boot_size: 8192,
            fallback_data_size: 20480,
        }
    }
}

impl ProvisionerConfig {
    /// Load configuration from environment variables
    ///
    /// `CIM_DISK_FORMAT`, `CIM_DVD_SIZE`, `CIM_FALLBACK_BOOT_SIZE` and
    /// `CIM_FALLBACK_DATA_SIZE`. Unparseable values are errors, not
    /// silently replaced by defaults.
    pub fn from_env() -> ModelResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ModelResult<Self> {
        let defaults = Self::default();

        let default_format = match lookup("CIM_DISK_FORMAT") {
            Some(raw) => DiskFormat::from_str(&raw).ok_or_else(|| {
                ModelError::Configuration(format!("CIM_DISK_FORMAT: unknown format '{}'", raw))
            })?,
            None => defaults.default_format,
        };

        Ok(Self {
            default_format,
            dvd_sentinel_size: parse_var(&lookup, "CIM_DVD_SIZE", defaults.dvd_sentinel_size)?,
            fallback_boot_size: parse_var(
                &lookup,
                "CIM_FALLBACK_BOOT_SIZE",
                defaults.fallback_boot_size,
            )?,
            fallback_data_size: parse_var(
                &lookup,
                "CIM_FALLBACK_DATA_SIZE",
                defaults.fallback_data_size,
            )?,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> ModelResult<T> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ModelError::Configuration(format!("{}: cannot parse '{}'", key, raw))),
        None => Ok(default),
    }
}
