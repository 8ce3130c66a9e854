//! Passwordless sudo grants.
//!
//! Policy note: the rule grants full, unrestricted, password-free escalation.
//! That is the intended behavior for fully trusted internal developer hosts;
//! deployments that need narrower rules should edit [`sudo_rule`].

use crate::context::ProvisionContext;
use crate::error::ProvisionError;
use crate::runner::PrivilegedRunner;

/// The single sudoers rule written for each developer.
pub fn sudo_rule(user: &str) -> String {
    format!("{} ALL=(ALL) NOPASSWD:ALL\n", user)
}

/// Write the sudoers drop-in for `user` and restrict it to mode 440.
///
/// The grant becomes live once the restriction succeeds. Nothing runs
/// between the write and the chmod, keeping the window in which the file
/// is world-readable as small as the two underlying primitives allow.
pub fn grant(
    runner: &dyn PrivilegedRunner,
    ctx: &ProvisionContext,
    user: &str,
) -> Result<(), ProvisionError> {
    let path = ctx.sudoers_file(user);

    runner
        .write_file(&path, &sudo_rule(user))
        .map_err(|source| ProvisionError::GrantWrite {
            user: user.to_string(),
            source,
        })?;

    runner
        .set_mode(&path, 0o440)
        .map_err(|source| ProvisionError::GrantPermission {
            user: user.to_string(),
            source,
        })
}
