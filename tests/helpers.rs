//! Shared helpers for integration tests.

#![allow(dead_code)]

#[path = "helpers_fixtures.rs"]
pub mod fixtures;

#[path = "helpers_lsp_client.rs"]
pub mod lsp_client;
