//! devprov library exports.
//!
//! The binary is a thin CLI over these modules; they are public so the
//! integration tests under `tests/` can drive the workflow against a fake
//! privileged runner.

pub mod account;
pub mod config;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod preflight;
pub mod process;
pub mod project;
pub mod runner;
pub mod sshkeys;
pub mod sudoers;
