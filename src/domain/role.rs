// Copyright (c) 2025 - Cowboy AI, Inc.
//! Machine role taxonomy
//!
//! The role selects which stanza template the interface compiler renders
//! for a machine's interfaces.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineRole {
    /// Network router; gateway for the LAN subnets it serves
    Router,
    /// Plain server with static or DHCP addressing
    Server,
}

impl MachineRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Router => "router",
            Self::Server => "server",
        }
    }

    pub fn is_router(&self) -> bool {
        matches!(self, Self::Router)
    }
}

impl Default for MachineRole {
    fn default() -> Self {
        Self::Server
    }
}

impl fmt::Display for MachineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
