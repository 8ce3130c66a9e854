//! Top-level provisioning workflow.
//!
//! Developers are processed strictly sequentially in input order, and each
//! developer's outcome is independent: a failure is recorded and the run
//! moves on. The shared project step, if requested, runs once afterwards
//! over the full developer list. No error escapes [`run`]; every input
//! developer gets an entry in the returned report.

use serde::Serialize;
use std::fmt;

use crate::account;
use crate::context::ProvisionContext;
use crate::project;
use crate::runner::PrivilegedRunner;
use crate::sshkeys::PrivateKey;

/// Outcome of one provisioning unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Success,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Success => "Success",
            Outcome::Failed => "Failed",
        })
    }
}

/// Per-developer result.
#[derive(Debug, Serialize)]
pub struct DeveloperReport {
    pub name: String,
    pub outcome: Outcome,
    /// Present on success. Excluded from serialized summaries; disclosure
    /// happens through the progress stream only.
    #[serde(skip)]
    pub private_key: Option<PrivateKey>,
}

/// Shared project result.
#[derive(Debug, Serialize)]
pub struct ProjectReport {
    pub name: String,
    pub outcome: Outcome,
}

/// Aggregated result of a provisioning run, in input order.
#[derive(Debug, Serialize)]
pub struct ProvisioningReport {
    pub developers: Vec<DeveloperReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_project: Option<ProjectReport>,
}

impl ProvisioningReport {
    /// Look up a developer's outcome by name.
    pub fn outcome_for(&self, name: &str) -> Option<Outcome> {
        self.developers
            .iter()
            .find(|dev| dev.name == name)
            .map(|dev| dev.outcome)
    }
}

/// Provision every developer, then the shared project if one was named.
///
/// An empty developer list is a no-op: no privileged operation runs and the
/// shared project step is skipped even when a project name is present.
pub fn run(
    runner: &dyn PrivilegedRunner,
    ctx: &ProvisionContext,
    developers: &[String],
    project: Option<&str>,
) -> ProvisioningReport {
    let mut report = ProvisioningReport {
        developers: Vec::with_capacity(developers.len()),
        shared_project: None,
    };

    if developers.is_empty() {
        return report;
    }

    for user in developers {
        println!("\nProvisioning developer: {}", user);
        let (outcome, private_key) = match account::create_developer(runner, ctx, user) {
            Ok(key) => {
                println!("Provisioned {}", user);
                println!("\nSSH private key for {} (sensitive):", user);
                println!("{}", key.expose().trim_end());
                (Outcome::Success, Some(key))
            }
            Err(err) => {
                let stage = err.stage();
                eprintln!(
                    "Failed to provision {} at {}: {:#}",
                    user,
                    stage,
                    anyhow::Error::new(err)
                );
                (Outcome::Failed, None)
            }
        };
        report.developers.push(DeveloperReport {
            name: user.clone(),
            outcome,
            private_key,
        });
    }

    if let Some(name) = project {
        println!("\nSetting up shared project: {}", name);
        // The full list is passed, including developers whose account
        // creation failed; their missing home directory surfaces as a
        // shared-project failure rather than being filtered out here.
        let outcome = match project::build(runner, ctx, name, developers) {
            Ok(()) => {
                println!("Shared project {} ready", name);
                Outcome::Success
            }
            Err(err) => {
                eprintln!(
                    "Failed to set up shared project {}: {:#}",
                    name,
                    anyhow::Error::new(err)
                );
                Outcome::Failed
            }
        };
        report.shared_project = Some(ProjectReport {
            name: name.to_string(),
            outcome,
        });
    }

    report
}
