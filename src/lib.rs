// ABOUTME: Library root for tagslot - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod builder;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod process;
pub mod registry;
pub mod types;
