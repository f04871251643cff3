// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - `identifiers`: ID encoding and endpoint origin rules
//! - `search_outcome`: redirect decisions over generated service layouts

mod identifiers;
mod search_outcome;
