// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Idempotence of rendering and provisioning, and set semantics of the
//! firewall allow-lists.

mod firewall_sets;
mod idempotence;
