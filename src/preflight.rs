//! Preflight checks for provisioning.
//!
//! Validates that every host tool the privileged runner shells out to is
//! present before anything mutates the machine. Run with `devprov preflight`.

use which::which;

/// Tools the host runner invokes.
pub const REQUIRED_TOOLS: &[&str] = &[
    "sudo",
    "useradd",
    "ssh-keygen",
    "chmod",
    "chown",
    "mkdir",
    "ln",
    "rm",
    "cat",
    "tee",
    "test",
];

/// Result of a single preflight check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Tool found.
    Pass,
    /// Tool missing; provisioning would fail.
    Fail,
}

/// Results of all preflight checks.
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    pub fn all_passed(&self) -> bool {
        self.checks
            .iter()
            .all(|check| check.status == CheckStatus::Pass)
    }

    /// Print a human-readable check table.
    pub fn print(&self) {
        println!("Preflight checks:");
        for check in &self.checks {
            let mark = match check.status {
                CheckStatus::Pass => "ok  ",
                CheckStatus::Fail => "MISS",
            };
            match &check.details {
                Some(details) => println!("  [{}] {:<12} {}", mark, check.name, details),
                None => println!("  [{}] {:<12}", mark, check.name),
            }
        }
    }
}

/// Check that every required host tool resolves on PATH.
pub fn run_preflight() -> PreflightReport {
    let checks = REQUIRED_TOOLS
        .iter()
        .map(|tool| match which(tool) {
            Ok(path) => CheckResult {
                name: tool.to_string(),
                status: CheckStatus::Pass,
                details: Some(path.display().to_string()),
            },
            Err(_) => CheckResult {
                name: tool.to_string(),
                status: CheckStatus::Fail,
                details: Some("not found on PATH".to_string()),
            },
        })
        .collect();

    PreflightReport { checks }
}
