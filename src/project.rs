//! Shared project workspace.
//!
//! Layout produced for project `P` and developers `d1..dn`:
//!
//! ```text
//! <project_root>/P          root:root 755
//! <project_root>/P/public   root:root 755
//! <home>/d1/P               d1:d1 755
//! <home>/d1/P/public  ->  <project_root>/P/public
//! ...
//! ```

use crate::context::ProvisionContext;
use crate::error::ProvisionError;
use crate::runner::PrivilegedRunner;

/// Build the shared project tree and link it into each developer's home.
///
/// The root and public directories are created idempotently; ownership and
/// mode are re-applied even when they already exist. The per-developer
/// `public` link is created only if no entry is present at that path, but
/// its ownership is re-asserted either way, so re-running against an
/// existing tree neither duplicates nor retargets the link.
///
/// A failure on any developer aborts the remaining loop; the step reports
/// one overall outcome rather than per-developer granularity.
pub fn build(
    runner: &dyn PrivilegedRunner,
    ctx: &ProvisionContext,
    project: &str,
    developers: &[String],
) -> Result<(), ProvisionError> {
    let fail = |source| ProvisionError::SharedProject { source };

    let root = ctx.project_dir(project);
    runner.make_dir(&root).map_err(fail)?;
    runner.set_owner(&root, "root", "root", false).map_err(fail)?;
    runner.set_mode(&root, 0o755).map_err(fail)?;

    let public = ctx.public_dir(project);
    runner.make_dir(&public).map_err(fail)?;
    runner.set_owner(&public, "root", "root", false).map_err(fail)?;
    runner.set_mode(&public, 0o755).map_err(fail)?;

    for user in developers {
        let user_dir = ctx.user_project_dir(user, project);
        runner.make_dir(&user_dir).map_err(fail)?;
        runner.set_owner(&user_dir, user, user, false).map_err(fail)?;
        runner.set_mode(&user_dir, 0o755).map_err(fail)?;

        let link = ctx.user_public_link(user, project);
        if !runner.entry_exists(&link).map_err(fail)? {
            runner.make_link(&public, &link).map_err(fail)?;
        }
        // Ownership of the link entry itself, never the shared target.
        runner.set_owner(&link, user, user, false).map_err(fail)?;
    }

    Ok(())
}
