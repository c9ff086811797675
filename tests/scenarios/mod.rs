// Copyright (c) 2025 - Cowboy AI, Inc.
//! Scenario suites

mod firewall;
mod interfaces;
mod machines;
mod provisioning;
