//! Per-account SSH credential provisioning.
//!
//! Generates an RSA-4096 keypair inside the account's `.ssh` directory,
//! locks down ownership and modes, seeds an empty authorized-keys file,
//! removes the public half from disk, and hands the private key material
//! back to the caller. The first failing step aborts the rest.

use std::fmt;

use crate::context::ProvisionContext;
use crate::error::ProvisionError;
use crate::runner::PrivilegedRunner;

/// Generated private key material.
///
/// Treated as a secret: `Debug` is redacted and the raw text is only
/// reachable through [`PrivateKey::expose`], so a caller choosing to
/// disclose it has to do so deliberately.
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Provision SSH credentials for `user`, returning the private key.
pub fn provision(
    runner: &dyn PrivilegedRunner,
    ctx: &ProvisionContext,
    user: &str,
) -> Result<PrivateKey, ProvisionError> {
    let ssh_dir = ctx.ssh_dir(user);
    let key = ctx.private_key(user);
    let pubkey = ctx.public_key(user);
    let auth_keys = ctx.authorized_keys(user);

    let fail = |step: &'static str| {
        let user = user.to_string();
        move |source| ProvisionError::Credential { user, step, source }
    };

    runner
        .make_dir(&ssh_dir)
        .map_err(fail("create the .ssh directory"))?;
    runner
        .generate_keypair(&key)
        .map_err(fail("generate the keypair"))?;

    runner
        .set_owner(&ssh_dir, user, user, true)
        .map_err(fail("hand the .ssh directory to the account"))?;
    runner
        .set_mode(&ssh_dir, 0o700)
        .map_err(fail("restrict the .ssh directory"))?;
    runner
        .set_mode(&key, 0o600)
        .map_err(fail("restrict the private key"))?;
    // The public half gets the conventional mode even though it is deleted
    // below; a failure between the two steps must not leave it writable.
    runner
        .set_mode(&pubkey, 0o644)
        .map_err(fail("restrict the public key"))?;

    runner
        .write_file(&auth_keys, "")
        .map_err(fail("create the authorized-keys file"))?;
    runner
        .set_mode(&auth_keys, 0o600)
        .map_err(fail("restrict the authorized-keys file"))?;

    runner
        .remove_file(&pubkey)
        .map_err(fail("discard the public key"))?;

    let material = runner
        .read_file(&key)
        .map_err(fail("read back the private key"))?;

    Ok(PrivateKey(material))
}
