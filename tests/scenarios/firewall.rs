// Copyright (c) 2025 - Cowboy AI, Inc.
//! Firewall accumulation through capabilities

use anyhow::Result;

use cim_machine_config::{
    Capability, FirewallPolicyAggregator, HostPattern, NetworkModel, OutboundMail, Protocol,
};

use crate::fixtures::*;

#[test]
fn test_add_egress_twice_keeps_one_entry() -> Result<()> {
    let mut web1 = web1();
    assert!(web1.egresses().is_none());

    web1.add_egress(HostPattern::parse("*:25,465")?);
    web1.add_egress(HostPattern::parse("*:25,465")?);

    assert_eq!(web1.egresses().map(|e| e.len()), Some(1));
    Ok(())
}

#[test]
fn test_rules_of_every_kind_accumulate() -> Result<()> {
    let mut svc = svc1();
    svc.add_ingress(HostPattern::parse("*:443")?);
    svc.add_forward(HostPattern::parse("10.0.0.0/24:8080")?);
    svc.add_listen(Protocol::Udp, HostPattern::parse("*:53")?);
    svc.add_listen(Protocol::Tcp, HostPattern::parse("*:53")?);

    assert_eq!(svc.ingresses().map(|s| s.len()), Some(1));
    assert_eq!(svc.forwards().map(|s| s.len()), Some(1));
    assert_eq!(svc.listens().map(|l| l.len()), Some(2));
    assert!(svc.egresses().is_none());
    Ok(())
}

#[test]
fn test_capability_through_network_model() -> Result<()> {
    let mut model = NetworkModel::from_declaration(&network_declaration())?;
    let mail: &dyn Capability = &OutboundMail;

    model.activate("web1", mail)?;
    model.activate("web1", mail)?;

    let frozen = model.freeze();
    let egresses = frozen
        .machine("web1")
        .and_then(|m| m.firewall().egresses())
        .ok_or_else(|| anyhow::anyhow!("web1 has no egress rules"))?;
    assert_eq!(egresses.len(), 1);
    assert!(egresses.contains(&HostPattern::parse(OutboundMail::EGRESS)?));
    Ok(())
}

/// A capability defined outside the crate only sees the add-only surface
struct DnsResolver;

impl Capability for DnsResolver {
    fn name(&self) -> &str {
        "dns_resolver"
    }

    fn apply_firewall(
        &self,
        target: &mut dyn FirewallPolicyAggregator,
    ) -> cim_machine_config::ModelResult<()> {
        target.add_listen(Protocol::Udp, HostPattern::parse("*:53")?);
        target.add_egress(HostPattern::parse("*:53")?);
        Ok(())
    }
}

#[test]
fn test_later_capabilities_keep_earlier_rules() -> Result<()> {
    let mut model = NetworkModel::from_declaration(&network_declaration())?;
    model.activate("web1", &OutboundMail)?;
    model.activate("web1", &DnsResolver)?;

    let web1 = model
        .machine("web1")
        .ok_or_else(|| anyhow::anyhow!("web1 is declared"))?;
    let egresses = web1
        .egresses()
        .ok_or_else(|| anyhow::anyhow!("web1 has egress rules"))?;
    assert_eq!(egresses.len(), 2);
    assert!(egresses.contains(&HostPattern::parse(OutboundMail::EGRESS)?));
    assert_eq!(web1.listens().map(|l| l.len()), Some(1));
    Ok(())
}
