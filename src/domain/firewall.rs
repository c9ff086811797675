// Copyright (c) 2025 - Cowboy AI, Inc.
//! Firewall policy embedded in every machine record
//!
//! Rule sets are unordered allow-lists with set-union semantics. Each one is
//! an `Option`: `None` means the declaration said nothing and the firewall
//! generator should fall back to its defaults, which is not the same as an
//! explicitly empty allow-list.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

use super::HostPattern;
use crate::errors::ModelResult;

/// Transport protocol a listen rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type PatternSet = BTreeSet<HostPattern>;

/// Per-machine firewall allow-lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    listens: Option<BTreeMap<Protocol, PatternSet>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    forwards: Option<PatternSet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    ingresses: Option<PatternSet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    egresses: Option<PatternSet>,
}

/// Raw pattern lists as they appear in a declaration
#[derive(Debug, Clone, Copy, Default)]
pub struct FirewallDeclaration<'a> {
    pub listen_tcp: Option<&'a [String]>,
    pub listen_udp: Option<&'a [String]>,
    pub forward: Option<&'a [String]>,
    pub ingress: Option<&'a [String]>,
    pub egress: Option<&'a [String]>,
}

impl FirewallPolicy {
    /// Build a policy; a set exists iff its raw list was declared
    pub fn from_declaration(decl: FirewallDeclaration<'_>) -> ModelResult<Self> {
        let listens = match (decl.listen_tcp, decl.listen_udp) {
            (None, None) => None,
            (tcp, udp) => {
                let mut listens = BTreeMap::new();
                if let Some(tcp) = tcp {
                    listens.insert(Protocol::Tcp, parse_patterns(tcp)?);
                }
                if let Some(udp) = udp {
                    listens.insert(Protocol::Udp, parse_patterns(udp)?);
                }
                Some(listens)
            }
        };

        Ok(Self {
            listens,
            forwards: decl.forward.map(parse_patterns).transpose()?,
            ingresses: decl.ingress.map(parse_patterns).transpose()?,
            egresses: decl.egress.map(parse_patterns).transpose()?,
        })
    }

    pub fn listens(&self) -> Option<&BTreeMap<Protocol, PatternSet>> {
        self.listens.as_ref()
    }

    pub fn listens_on(&self, protocol: Protocol) -> Option<&PatternSet> {
        self.listens.as_ref().and_then(|l| l.get(&protocol))
    }

    pub fn forwards(&self) -> Option<&PatternSet> {
        self.forwards.as_ref()
    }

    pub fn ingresses(&self) -> Option<&PatternSet> {
        self.ingresses.as_ref()
    }

    pub fn egresses(&self) -> Option<&PatternSet> {
        self.egresses.as_ref()
    }

    /// Returns `true` if the pattern was not already present
    pub(crate) fn insert_egress(&mut self, pattern: HostPattern) -> bool {
        self.egresses.get_or_insert_with(BTreeSet::new).insert(pattern)
    }

    pub(crate) fn insert_ingress(&mut self, pattern: HostPattern) -> bool {
        self.ingresses.get_or_insert_with(BTreeSet::new).insert(pattern)
    }

    pub(crate) fn insert_forward(&mut self, pattern: HostPattern) -> bool {
        self.forwards.get_or_insert_with(BTreeSet::new).insert(pattern)
    }

    pub(crate) fn insert_listen(&mut self, protocol: Protocol, pattern: HostPattern) -> bool {
        self.listens
            .get_or_insert_with(BTreeMap::new)
            .entry(protocol)
            .or_default()
            .insert(pattern)
    }
}

fn parse_patterns(raw: &[String]) -> ModelResult<PatternSet> {
    raw.iter().map(|p| HostPattern::parse(p)).collect()
}

pub(crate) mod sealed {
    use super::FirewallPolicy;

    /// Mutable policy access, reachable only from inside the crate
    pub trait PolicyStore {
        fn firewall_mut(&mut self) -> &mut FirewallPolicy;
    }
}

use sealed::PolicyStore;

/// Append-only access to a machine's firewall policy
///
/// This is how capability activation extends a record's allow-lists after
/// construction, while the record is still in its accumulating phase.
/// Nothing here removes a rule, and the trait is sealed: only records
/// defined in this crate implement it.
pub trait FirewallPolicyAggregator: PolicyStore {
    /// Label of the machine the policy belongs to
    fn policy_owner(&self) -> &str;

    fn firewall(&self) -> &FirewallPolicy;

    fn add_egress(&mut self, pattern: HostPattern) {
        let owner = self.policy_owner().to_string();
        if self.firewall_mut().insert_egress(pattern.clone()) {
            debug!("Added egress {} to {}", pattern, owner);
        }
    }

    fn add_ingress(&mut self, pattern: HostPattern) {
        let owner = self.policy_owner().to_string();
        if self.firewall_mut().insert_ingress(pattern.clone()) {
            debug!("Added ingress {} to {}", pattern, owner);
        }
    }

    fn add_forward(&mut self, pattern: HostPattern) {
        let owner = self.policy_owner().to_string();
        if self.firewall_mut().insert_forward(pattern.clone()) {
            debug!("Added forward {} to {}", pattern, owner);
        }
    }

    fn add_listen(&mut self, protocol: Protocol, pattern: HostPattern) {
        let owner = self.policy_owner().to_string();
        if self.firewall_mut().insert_listen(protocol, pattern.clone()) {
            debug!("Added {} listen {} to {}", protocol, pattern, owner);
        }
    }

    fn egresses(&self) -> Option<&PatternSet> {
        self.firewall().egresses()
    }

    fn ingresses(&self) -> Option<&PatternSet> {
        self.firewall().ingresses()
    }

    fn forwards(&self) -> Option<&PatternSet> {
        self.firewall().forwards()
    }

    fn listens(&self) -> Option<&BTreeMap<Protocol, PatternSet>> {
        self.firewall().listens()
    }
}
