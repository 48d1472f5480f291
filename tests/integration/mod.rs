//! Integration tests for statesnap
//!
//! These tests drive recording, assembly and replay through the public API
//! and the binary.

#[path = "../common/mod.rs"]
pub mod common;

pub mod cli;
pub mod record_replay;
