// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Firewall Allow-Lists
//!
//! Additions have set-union semantics: order and repetition never matter.

use cim_machine_config::{FirewallPolicyAggregator, HostPattern, MachineDeclaration, MachineRecord};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn pattern() -> impl Strategy<Value = HostPattern> {
    (
        prop_oneof![
            Just("*".to_string()),
            (1u8..=254).prop_map(|o| format!("10.0.0.{}", o)),
            "[a-z]{1,8}\\.example",
        ],
        prop::collection::vec(1u16..=65535, 0..4),
    )
        .prop_map(|(host, ports)| {
            let text = if ports.is_empty() {
                host
            } else {
                let ports: Vec<String> = ports.iter().map(u16::to_string).collect();
                format!("{}:{}", host, ports.join(","))
            };
            HostPattern::parse(&text).expect("Generated pattern is valid")
        })
}

fn record() -> MachineRecord {
    MachineRecord::from_declaration("web1", &MachineDeclaration::new("web1.example"))
        .expect("Fixture declaration is valid")
}

proptest! {
    /// Property: Egress rules equal the set of added patterns
    #[test]
    fn prop_egress_is_set_union(patterns in prop::collection::vec(pattern(), 1..12)) {
        let mut machine = record();
        for p in &patterns {
            machine.add_egress(p.clone());
        }
        for p in &patterns {
            machine.add_egress(p.clone());
        }

        let expected: BTreeSet<HostPattern> = patterns.into_iter().collect();
        prop_assert_eq!(machine.egresses(), Some(&expected));
    }

    /// Property: Insertion order does not matter
    #[test]
    fn prop_egress_order_independent(patterns in prop::collection::vec(pattern(), 1..12)) {
        let mut forward = record();
        let mut backward = record();
        for p in &patterns {
            forward.add_egress(p.clone());
        }
        for p in patterns.iter().rev() {
            backward.add_egress(p.clone());
        }
        prop_assert_eq!(forward, backward);
    }

    /// Property: A pattern survives a display and parse cycle
    #[test]
    fn prop_pattern_display_parses_back(p in pattern()) {
        prop_assert_eq!(HostPattern::parse(&p.to_string()).expect("Displayed pattern parses"), p);
    }
}
