// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for machine model construction and artifact generation

use thiserror::Error;

use crate::domain::{HostnameError, NetworkError};

/// Errors that can occur while building or provisioning machine models
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Malformed hostname, host pattern or IP literal
    #[error("Invalid host: {0}")]
    InvalidHost(String),

    /// Malformed contact address
    #[error("Invalid email address: {0}")]
    InvalidEmailAddress(String),

    /// Contradictory or unresolvable disk size/format/medium combination
    #[error("Invalid disk spec for '{label}': {reason}")]
    InvalidDiskSpec { label: String, reason: String },

    /// Hypervisor configuration lacks a value we need
    #[error("Hypervisor '{hypervisor}' has no {setting} configured")]
    MissingHypervisorDefault { hypervisor: String, setting: String },

    /// Interface name declared more than once on a machine
    #[error("Interface '{iface}' declared more than once on {host}")]
    DuplicateInterface { iface: String, host: String },

    /// Interface declaration that cannot be rendered
    #[error("Invalid interface '{iface}': {reason}")]
    InvalidInterface { iface: String, reason: String },

    /// Label does not name a declared machine
    #[error("Unknown machine: {0}")]
    UnknownMachine(String),

    /// Declaration could not be deserialized or is structurally wrong
    #[error("Declaration error: {0}")]
    Declaration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

impl From<HostnameError> for ModelError {
    fn from(err: HostnameError) -> Self {
        ModelError::InvalidHost(err.to_string())
    }
}

impl From<NetworkError> for ModelError {
    fn from(err: NetworkError) -> Self {
        ModelError::InvalidHost(err.to_string())
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Declaration(err.to_string())
    }
}
