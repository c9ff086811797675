// Copyright (c) 2025 - Cowboy AI, Inc.
//! Disk descriptors for hypervisor-hosted services

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::declaration::DiskDeclaration;
use crate::errors::{ModelError, ModelResult};

/// Kind of storage device a disk represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    /// Persistent virtual disk
    Disk,
    /// Removable/install media
    Dvd,
}

impl Default for Medium {
    fn default() -> Self {
        Self::Disk
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disk => "disk",
            Self::Dvd => "dvd",
        })
    }
}

/// Virtual disk image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskFormat {
    Vmdk,
    Vdi,
    Vhd,
    Qcow2,
    Raw,
}

impl DiskFormat {
    /// File extension used for the backing file
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Vmdk => "vmdk",
            Self::Vdi => "vdi",
            Self::Vhd => "vhd",
            Self::Qcow2 => "qcow2",
            Self::Raw => "img",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vmdk" => Some(Self::Vmdk),
            "vdi" => Some(Self::Vdi),
            "vhd" => Some(Self::Vhd),
            "qcow2" => Some(Self::Qcow2),
            "raw" | "img" => Some(Self::Raw),
            _ => None,
        }
    }
}

impl fmt::Display for DiskFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Where a disk entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskOrigin {
    Declared,
    Generated,
}

/// One disk attached to a service
///
/// Sizes are in MiB. `size` is `None` until the provisioner resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskRecord {
    label: String,
    medium: Medium,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<DiskFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    origin: DiskOrigin,
}

impl DiskRecord {
    /// Validate a declared disk
    ///
    /// DVD media must not carry a format and no disk may be declared with
    /// size zero. The declared path is kept only for DVD media; persistent
    /// disks always live under the hypervisor's disk tree.
    pub fn from_declaration(label: impl Into<String>, decl: &DiskDeclaration) -> ModelResult<Self> {
        let label = label.into();
        validate_label(&label)?;

        let medium = decl.medium.unwrap_or_default();
        let invalid = |reason: &str| ModelError::InvalidDiskSpec {
            label: label.clone(),
            reason: reason.to_string(),
        };

        if medium == Medium::Dvd && decl.format.is_some() {
            return Err(invalid("DVD media cannot have a disk format"));
        }
        if decl.size == Some(0) {
            return Err(invalid("size must be greater than zero"));
        }

        let path = match (medium, decl.path.as_deref().map(str::trim)) {
            (Medium::Dvd, Some(path)) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => None,
        };

        Ok(Self {
            medium,
            format: decl.format,
            path,
            size: decl.size,
            description: decl.description.clone(),
            origin: DiskOrigin::Declared,
            label,
        })
    }

    /// A provisioner-generated persistent disk
    pub fn generated_disk(
        label: impl Into<String>,
        format: DiskFormat,
        path: PathBuf,
        size: u64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            medium: Medium::Disk,
            format: Some(format),
            path: Some(path),
            size: Some(size),
            description: Some(description.into()),
            origin: DiskOrigin::Generated,
        }
    }

    /// A provisioner-generated install medium
    pub fn generated_dvd(
        label: impl Into<String>,
        path: PathBuf,
        size: u64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            medium: Medium::Dvd,
            format: None,
            path: Some(path),
            size: Some(size),
            description: Some(description.into()),
            origin: DiskOrigin::Generated,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }

    pub fn format(&self) -> Option<DiskFormat> {
        self.format
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn origin(&self) -> DiskOrigin {
        self.origin
    }

    pub(crate) fn set_format(&mut self, format: DiskFormat) {
        self.format = Some(format);
    }

    pub(crate) fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    pub(crate) fn set_size(&mut self, size: u64) {
        self.size = Some(size);
    }
}

fn validate_label(label: &str) -> ModelResult<()> {
    let ok = !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && label != "."
        && label != "..";

    if ok {
        Ok(())
    } else {
        Err(ModelError::InvalidDiskSpec {
            label: label.to_string(),
            reason: "label must be a plain file name".to_string(),
        })
    }
}
