// Copyright (c) 2025 - Cowboy AI, Inc.
//! Capabilities
//!
//! A capability is a profile a machine opts into. Activating one extends
//! the machine's firewall allow-lists while the record is still being
//! assembled.

use crate::domain::{FirewallPolicyAggregator, HostPattern};
use crate::errors::ModelResult;

pub trait Capability: Send + Sync {
    fn name(&self) -> &str;

    /// Add the rules this capability needs
    fn apply_firewall(&self, target: &mut dyn FirewallPolicyAggregator) -> ModelResult<()>;
}

/// Outbound mail relay (SMTP and SMTPS submission)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutboundMail;

impl OutboundMail {
    pub const EGRESS: &'static str = "*:25,465";
}

impl Capability for OutboundMail {
    fn name(&self) -> &str {
        "outbound_mail"
    }

    fn apply_firewall(&self, target: &mut dyn FirewallPolicyAggregator) -> ModelResult<()> {
        target.add_egress(HostPattern::parse(Self::EGRESS)?);
        Ok(())
    }
}
