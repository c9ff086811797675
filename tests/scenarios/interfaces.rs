// Copyright (c) 2025 - Cowboy AI, Inc.
//! Interface configuration rendering

use anyhow::Result;
use pretty_assertions::assert_eq;

use cim_machine_config::{generate_persistent_config, InterfaceCompiler, MachineRole};

use crate::fixtures::*;

const PREAMBLE: &str = "source /etc/network/interfaces.d/*\n\
                        \n\
                        iface lo inet loopback\n\
                        pre-up /etc/ipsets/ipsets.up.sh | ipset -! restore\n\
                        pre-up /etc/iptables/iptables.conf.sh | iptables-restore\n\
                        \n";

#[test]
fn test_single_server_interface() {
    init_tracing();
    let web1 = web1();

    let config = generate_persistent_config([&web1], MachineRole::Server);

    assert_eq!(config, format!("{}auto lo eth0\n\niface eth0 inet dhcp\n", PREAMBLE));
}

#[test]
fn test_router_rendering() {
    init_tracing();
    let router = router();

    let config = generate_persistent_config([&router], MachineRole::Router);

    assert_eq!(
        config,
        format!(
            "{}auto lo lan0 wan0\n\
             \n\
             # office\n\
             iface lan0 inet static\n\
             \taddress 10.0.0.1\n\
             \tnetmask 255.255.255.0\n\
             \n\
             iface wan0 inet static\n\
             \taddress 198.51.100.2\n\
             \tnetmask 255.255.255.252\n\
             \tgateway 198.51.100.1\n",
            PREAMBLE
        )
    );
}

#[test]
fn test_same_machine_as_server_keeps_lan_gateway() {
    let config = generate_persistent_config([&router()], MachineRole::Server);
    assert!(config.contains("\tgateway 10.0.0.254"));
}

#[test]
fn test_rendering_twice_is_identical() {
    let router = router();
    let mut compiler = InterfaceCompiler::new(MachineRole::Router);
    compiler.add_machine(&router);
    compiler.add_ppp_iface("ppp_provider", "dsl0");

    let first = compiler.persistent_config();
    let second = compiler.persistent_config();
    assert_eq!(first, second);
    assert_eq!(compiler.units(), compiler.units());
}

#[test]
fn test_machines_render_in_registration_order() -> Result<()> {
    let config = generate_persistent_config([&router(), &web1()], MachineRole::Server);
    assert!(config.contains("auto lo lan0 wan0 eth0\n"));

    let lan0 = config.find("iface lan0").ok_or_else(|| anyhow::anyhow!("lan0 missing"))?;
    let eth0 = config.find("iface eth0").ok_or_else(|| anyhow::anyhow!("eth0 missing"))?;
    assert!(lan0 < eth0);
    Ok(())
}
