// Copyright (c) 2025 - Cowboy AI, Inc.
//! Machine record construction from declarations

use anyhow::Result;
use test_case::test_case;

use cim_machine_config::{
    MachineDeclaration, MachineRecord, ModelError, NetworkModel, MachineRole,
};

use crate::fixtures::*;

#[test]
fn test_email_absent() -> Result<()> {
    let record = MachineRecord::from_declaration("web1", &web1_declaration())?;
    assert!(record.email().is_none());
    Ok(())
}

#[test_case("not-an-email" ; "no at sign")]
#[test_case("ops@@example.org" ; "double at sign")]
#[test_case("ops@localhost" ; "dotless domain")]
#[test_case(".ops@example.org" ; "leading dot")]
fn test_invalid_email_rejected(email: &str) {
    let mut decl = web1_declaration();
    decl.email = Some(email.to_string());

    assert!(matches!(
        MachineRecord::from_declaration("web1", &decl),
        Err(ModelError::InvalidEmailAddress(_))
    ));
}

#[test_case(r#"{"fqdn": "web1.example", "lan": [{"iface": "eth0", "address": "10.0.0.999/24"}]}"# ; "bad interface address")]
#[test_case(r#"{"fqdn": "web1.example", "externalip": "nope"}"# ; "bad external ip")]
#[test_case(r#"{"fqdn": "web1.example", "egress": ["host name:80"]}"# ; "bad egress host")]
#[test_case(r#"{"fqdn": "-web1.example"}"# ; "bad fqdn")]
fn test_invalid_host_rejected(json: &str) -> Result<()> {
    let decl = MachineDeclaration::from_json(json)?;
    assert!(matches!(
        MachineRecord::from_declaration("web1", &decl),
        Err(ModelError::InvalidHost(_))
    ));
    Ok(())
}

#[test]
fn test_malformed_json_is_declaration_error() {
    assert!(matches!(
        MachineDeclaration::from_json(r#"{"fqdn": 42}"#),
        Err(ModelError::Declaration(_))
    ));
}

#[test]
fn test_network_model_from_fixture() -> Result<()> {
    init_tracing();
    let model = NetworkModel::from_declaration(&network_declaration())?;

    assert_eq!(model.role_of("router")?, MachineRole::Router);
    assert_eq!(model.role_of("web1")?, MachineRole::Server);
    assert_eq!(
        model.machine("web1").and_then(|m| m.email()).map(|e| e.to_string()),
        Some("ops@example.org".to_string())
    );
    assert_eq!(model.machines().count(), 3);
    assert_eq!(
        model.user("alice").and_then(|u| u.full_name()),
        Some("Dr McNuggets")
    );
    Ok(())
}

#[test]
fn test_record_json_carries_owner_fqdn_on_interfaces() -> Result<()> {
    let record = MachineRecord::from_declaration("web1", &web1_declaration())?;
    let json = serde_json::to_value(&record)?;

    assert_eq!(json["fqdn"], "web1.example");
    let hosts: Vec<&serde_json::Value> = json["lan_interfaces"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("web1 has lan interfaces"))?
        .iter()
        .map(|iface| &iface["host"])
        .collect();
    assert!(hosts.iter().all(|host| *host == "web1.example"));
    Ok(())
}

#[test]
fn test_duplicate_interfaces_only_enter_through_validation() -> Result<()> {
    let decl = MachineDeclaration::from_json(
        r#"{"fqdn": "web1.example", "lan": [{"iface": "eth0"}, {"iface": "eth0"}]}"#,
    )?;
    assert!(matches!(
        MachineRecord::from_declaration("web1", &decl),
        Err(ModelError::DuplicateInterface { .. })
    ));
    Ok(())
}
