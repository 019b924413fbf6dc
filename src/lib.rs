// ABOUTME: Library root for promoter - exposes the deployment core for the binary and tests.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod publish;
pub mod source;
pub mod substitution;
pub mod types;
