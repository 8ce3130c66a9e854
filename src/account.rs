//! Developer account creation.

use crate::context::ProvisionContext;
use crate::error::ProvisionError;
use crate::runner::PrivilegedRunner;
use crate::sshkeys::{self, PrivateKey};
use crate::sudoers;

/// Create one developer: OS account, sudo grant, SSH credentials.
///
/// Stages run in fixed order and short-circuit on the first failure. There
/// is no rollback: an account whose later stage failed stays on the host
/// and needs manual remediation. Account creation is not idempotent, so a
/// pre-existing account name fails here.
pub fn create_developer(
    runner: &dyn PrivilegedRunner,
    ctx: &ProvisionContext,
    user: &str,
) -> Result<PrivateKey, ProvisionError> {
    runner
        .create_account(user, &ctx.login_shell)
        .map_err(|source| ProvisionError::AccountCreation {
            user: user.to_string(),
            source,
        })?;

    sudoers::grant(runner, ctx, user)?;
    sshkeys::provision(runner, ctx, user)
}
