//! Provisioning error taxonomy.
//!
//! Every stage failure wraps the underlying [`RunnerError`], so the full
//! chain identifies the developer, the stage, the privileged operation, and
//! the OS-level cause. Errors never cross the orchestrator boundary; they
//! are converted into per-developer outcomes there.

use std::fmt;
use thiserror::Error;

use crate::runner::RunnerError;

/// Stage of the per-developer provisioning state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AccountCreation,
    SudoGrant,
    CredentialProvisioning,
    SharedProject,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::AccountCreation => "account creation",
            Stage::SudoGrant => "sudo grant",
            Stage::CredentialProvisioning => "ssh credential provisioning",
            Stage::SharedProject => "shared project setup",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("account creation failed for {user}")]
    AccountCreation {
        user: String,
        #[source]
        source: RunnerError,
    },

    #[error("sudoers rule write failed for {user}")]
    GrantWrite {
        user: String,
        #[source]
        source: RunnerError,
    },

    #[error("sudoers permission restriction failed for {user}")]
    GrantPermission {
        user: String,
        #[source]
        source: RunnerError,
    },

    #[error("ssh credential provisioning failed for {user} while trying to {step}")]
    Credential {
        user: String,
        step: &'static str,
        #[source]
        source: RunnerError,
    },

    #[error("shared project setup failed")]
    SharedProject {
        #[source]
        source: RunnerError,
    },
}

impl ProvisionError {
    /// The stage at which provisioning stopped.
    pub fn stage(&self) -> Stage {
        match self {
            ProvisionError::AccountCreation { .. } => Stage::AccountCreation,
            ProvisionError::GrantWrite { .. } | ProvisionError::GrantPermission { .. } => {
                Stage::SudoGrant
            }
            ProvisionError::Credential { .. } => Stage::CredentialProvisioning,
            ProvisionError::SharedProject { .. } => Stage::SharedProject,
        }
    }
}
