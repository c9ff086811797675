// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network users

use serde::Serialize;

use super::{AddressResolver, IpAddressWithCidr};
use crate::declaration::UserDeclaration;
use crate::errors::ModelResult;

/// A person with access to the network
///
/// Every field is optional; only the full name has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    label: String,
    username: Option<String>,
    full_name: Option<String>,
    ssh_key: Option<String>,
    home_dir: Option<String>,
    default_passphrase: Option<String>,
    wireguard_key: Option<String>,
    wireguard_ip: Option<IpAddressWithCidr>,
}

impl UserRecord {
    pub const DEFAULT_FULL_NAME: &'static str = "Dr McNuggets";

    pub fn from_declaration(label: impl Into<String>, decl: &UserDeclaration) -> ModelResult<Self> {
        let wireguard = decl.wireguard.as_ref();

        Ok(Self {
            label: label.into(),
            username: non_blank(decl.username.as_deref()),
            full_name: non_blank(decl.fullname.as_deref())
                .or_else(|| Some(Self::DEFAULT_FULL_NAME.to_string())),
            ssh_key: non_blank(decl.ssh.as_deref()),
            home_dir: non_blank(decl.home_dir.as_deref()),
            default_passphrase: non_blank(decl.defaultpw.as_deref()),
            wireguard_key: non_blank(wireguard.and_then(|wg| wg.key.as_deref())),
            wireguard_ip: AddressResolver::resolve_ip(wireguard.and_then(|wg| wg.ip.as_deref()))?,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn ssh_key(&self) -> Option<&str> {
        self.ssh_key.as_deref()
    }

    pub fn home_dir(&self) -> Option<&str> {
        self.home_dir.as_deref()
    }

    pub fn default_passphrase(&self) -> Option<&str> {
        self.default_passphrase.as_deref()
    }

    pub fn wireguard_key(&self) -> Option<&str> {
        self.wireguard_key.as_deref()
    }

    pub fn wireguard_ip(&self) -> Option<&IpAddressWithCidr> {
        self.wireguard_ip.as_ref()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
