// Copyright (c) 2025 - Cowboy AI, Inc.
//! Interface configuration compiler
//!
//! Collects interface registrations for one machine and renders the
//! persistent `/etc/network/interfaces` file. Rendering reads only the
//! registrations, so rendering twice yields byte-identical text.
//!
//! ```text
//! source /etc/network/interfaces.d/*
//!
//! iface lo inet loopback
//! pre-up /etc/ipsets/ipsets.up.sh | ipset -! restore
//! pre-up /etc/iptables/iptables.conf.sh | iptables-restore
//!
//! auto lo eth0
//!
//! iface eth0 inet dhcp
//! ```

use indexmap::{IndexMap, IndexSet};
use std::fmt::Write as _;
use tracing::debug;

use crate::config::CompilerConfig;
use crate::domain::{MachineRecord, MachineRole, NetworkInterfaceRecord};
use crate::unit::ConfigUnit;

/// Label of the unit that persists the rendered file
pub const PERSIST_UNIT: &str = "net_conf_persist";

const HEREDOC_DELIMITER: &str = "CIM_NET_CONF";

#[derive(Debug, Clone)]
pub struct InterfaceCompiler {
    role: MachineRole,
    config: CompilerConfig,
    /// Names brought up on boot, in first-registration order
    names: IndexSet<String>,
    custom_stanzas: Vec<String>,
    /// Physical interfaces carrying a PPP provider
    ppp_ifaces: IndexSet<String>,
    interfaces: IndexMap<String, NetworkInterfaceRecord>,
}

impl InterfaceCompiler {
    pub fn new(role: MachineRole) -> Self {
        Self::with_config(role, CompilerConfig::default())
    }

    pub fn with_config(role: MachineRole, config: CompilerConfig) -> Self {
        Self {
            role,
            config,
            names: IndexSet::new(),
            custom_stanzas: Vec::new(),
            ppp_ifaces: IndexSet::new(),
            interfaces: IndexMap::new(),
        }
    }

    pub fn role(&self) -> MachineRole {
        self.role
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Register every interface of a machine, LAN before WAN
    pub fn add_machine(&mut self, machine: &MachineRecord) -> &mut Self {
        for iface in machine.interfaces() {
            self.add_iface(iface.clone());
        }
        self
    }

    /// Register one interface
    ///
    /// Returns `false` when an interface of that name is already
    /// registered; the first registration is kept.
    pub fn add_iface(&mut self, iface: NetworkInterfaceRecord) -> bool {
        let name = iface.iface().to_string();
        if self.interfaces.contains_key(&name) {
            debug!("Interface {} already registered, keeping the first", name);
            return false;
        }

        debug!("Registered interface {} ({})", name, self.role);
        self.names.insert(name.clone());
        self.interfaces.insert(name, iface);
        true
    }

    /// Register a PPP uplink over the physical interface `iface`
    ///
    /// The returned unit audits the persisted file for the provider stanza
    /// and depends on [`PERSIST_UNIT`]. The provider stanza replaces any
    /// plain stanza registered for `iface`.
    pub fn add_ppp_iface(&mut self, name: impl Into<String>, iface: &str) -> ConfigUnit {
        let stanza = format!(
            "iface {} inet manual\n\nauto provider\niface provider inet ppp\nprovider provider",
            iface
        );

        debug!("Registered PPP provider over {}", iface);
        self.custom_stanzas.push(stanza);
        self.names.insert(iface.to_string());
        self.ppp_ifaces.insert(iface.to_string());

        ConfigUnit::new(
            name,
            "echo \"handled by model\";",
            format!(
                "grep \"iface provider inet ppp\" {};",
                self.config.interfaces_path.display()
            ),
            "iface provider inet ppp",
            format!("Couldn't configure the PPP provider on {}", iface),
        )
        .with_precondition(PERSIST_UNIT)
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &NetworkInterfaceRecord> {
        self.interfaces.values()
    }

    /// Render the full interfaces file
    pub fn persistent_config(&self) -> String {
        let mut net = String::new();

        let _ = writeln!(net, "source {}", self.config.source_glob);
        net.push('\n');
        net.push_str("iface lo inet loopback\n");
        for hook in &self.config.pre_up_hooks {
            let _ = writeln!(net, "pre-up {}", hook);
        }

        net.push_str("\nauto lo");
        for name in &self.names {
            net.push(' ');
            net.push_str(name);
        }

        for stanza in &self.custom_stanzas {
            net.push_str("\n\n");
            net.push_str(stanza);
        }

        for iface in self.interfaces.values() {
            if self.ppp_ifaces.contains(iface.iface()) {
                continue;
            }
            net.push_str("\n\n");
            match self.role {
                MachineRole::Router => net.push_str(&iface.router_stanza()),
                MachineRole::Server => net.push_str(&iface.server_stanza()),
            }
        }

        let mut net = net.trim().to_string();
        net.push('\n');
        net
    }

    /// The unit persisting [`InterfaceCompiler::persistent_config`]
    pub fn units(&self) -> Vec<ConfigUnit> {
        let persistent = self.persistent_config();
        let path = self.config.interfaces_path.display();

        vec![ConfigUnit::new(
            PERSIST_UNIT,
            format!(
                "sudo tee {} > /dev/null <<'{delim}'\n{}{delim}\nsudo service networking restart;",
                path,
                persistent,
                delim = HEREDOC_DELIMITER
            ),
            format!("cat {};", path),
            persistent,
            "Couldn't create our required network interfaces. This will cause all sorts of issues.",
        )]
    }
}

/// Render the interfaces file for a set of machine records in one go
pub fn generate_persistent_config<'a>(
    records: impl IntoIterator<Item = &'a MachineRecord>,
    role: MachineRole,
) -> String {
    let mut compiler = InterfaceCompiler::new(role);
    for record in records {
        compiler.add_machine(record);
    }
    compiler.persistent_config()
}
