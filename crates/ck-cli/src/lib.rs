//! cipherkit CLI library.
//!
//! Command implementations, `.ck.yaml` project defaults and exit codes for
//! the `ck` binary.

pub mod commands;
pub mod exit_codes;
pub mod project_config;
