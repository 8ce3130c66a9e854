//! The privileged-operation seam between orchestration logic and the host.
//!
//! Everything that mutates OS state funnels through [`PrivilegedRunner`], so
//! the provisioning workflow can be exercised against a recording fake
//! without touching a real machine. [`HostRunner`] is the production
//! implementation; it shells out with sudo elevation via [`crate::process`].

use std::path::Path;
use thiserror::Error;

use crate::process::Cmd;

/// A failed privileged operation: which operation, against what, and why.
#[derive(Debug, Error)]
#[error("{op} failed for {target}")]
pub struct RunnerError {
    /// Operation name, e.g. "create-account" or "set-permission".
    pub op: &'static str,
    /// Target path or account name.
    pub target: String,
    #[source]
    pub source: anyhow::Error,
}

impl RunnerError {
    pub fn new(op: &'static str, target: impl Into<String>, source: anyhow::Error) -> Self {
        Self {
            op,
            target: target.into(),
            source,
        }
    }
}

pub type RunnerResult<T = ()> = Result<T, RunnerError>;

/// One method per privileged primitive the provisioning workflow needs.
///
/// No retries at this layer; retry and skip decisions belong to callers.
/// Idempotency follows the underlying primitive: directory creation is
/// idempotent, account creation is not.
pub trait PrivilegedRunner {
    /// Create an OS account with a home directory and the given login shell.
    fn create_account(&self, name: &str, shell: &str) -> RunnerResult;

    /// Write `content` to a file at a privileged path, creating it if absent.
    fn write_file(&self, path: &Path, content: &str) -> RunnerResult;

    /// Set the permission bits of a path.
    fn set_mode(&self, path: &Path, mode: u32) -> RunnerResult;

    /// Set owner and group of a path, optionally recursively.
    ///
    /// Non-recursive ownership changes apply to the entry itself and never
    /// follow a symbolic link.
    fn set_owner(&self, path: &Path, owner: &str, group: &str, recursive: bool) -> RunnerResult;

    /// Create a directory, including missing parents. Idempotent.
    fn make_dir(&self, path: &Path) -> RunnerResult;

    /// Create a symbolic link at `link` pointing to `target`.
    fn make_link(&self, target: &Path, link: &Path) -> RunnerResult;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> RunnerResult;

    /// Read a file's contents, even when unreadable by the invoking user.
    fn read_file(&self, path: &Path) -> RunnerResult<String>;

    /// Generate an RSA-4096 keypair with no passphrase at `key_path`,
    /// leaving the public half at `<key_path>.pub`.
    fn generate_keypair(&self, key_path: &Path) -> RunnerResult;

    /// Check whether any entry (file, directory, or link) exists at `path`.
    fn entry_exists(&self, path: &Path) -> RunnerResult<bool>;
}

/// Production runner: executes each primitive on the local host via sudo.
#[derive(Debug, Default)]
pub struct HostRunner;

impl HostRunner {
    pub fn new() -> Self {
        Self
    }
}

fn runner_err(op: &'static str, target: &Path) -> impl FnOnce(anyhow::Error) -> RunnerError {
    let target = target.display().to_string();
    move |source| RunnerError::new(op, target, source)
}

impl PrivilegedRunner for HostRunner {
    fn create_account(&self, name: &str, shell: &str) -> RunnerResult {
        Cmd::new("useradd")
            .args(["-m", "-s", shell, name])
            .sudo()
            .error_msg(format!("useradd {} failed", name))
            .run()
            .map(|_| ())
            .map_err(|source| RunnerError::new("create-account", name, source))
    }

    fn write_file(&self, path: &Path, content: &str) -> RunnerResult {
        // tee runs as root so the target may live under /etc or another
        // user's home; its stdout echo is discarded.
        Cmd::new("tee")
            .arg_path(path)
            .stdin(content)
            .sudo()
            .run()
            .map(|_| ())
            .map_err(runner_err("set-file-content", path))
    }

    fn set_mode(&self, path: &Path, mode: u32) -> RunnerResult {
        Cmd::new("chmod")
            .arg(format!("{:o}", mode))
            .arg_path(path)
            .sudo()
            .run()
            .map(|_| ())
            .map_err(runner_err("set-permission", path))
    }

    fn set_owner(&self, path: &Path, owner: &str, group: &str, recursive: bool) -> RunnerResult {
        let mut cmd = Cmd::new("chown");
        // -h keeps a non-recursive chown on the link entry itself.
        cmd = if recursive { cmd.arg("-R") } else { cmd.arg("-h") };
        cmd.arg(format!("{}:{}", owner, group))
            .arg_path(path)
            .sudo()
            .run()
            .map(|_| ())
            .map_err(runner_err("set-owner", path))
    }

    fn make_dir(&self, path: &Path) -> RunnerResult {
        Cmd::new("mkdir")
            .arg("-p")
            .arg_path(path)
            .sudo()
            .run()
            .map(|_| ())
            .map_err(runner_err("make-directory", path))
    }

    fn make_link(&self, target: &Path, link: &Path) -> RunnerResult {
        Cmd::new("ln")
            .arg("-s")
            .arg_path(target)
            .arg_path(link)
            .sudo()
            .run()
            .map(|_| ())
            .map_err(runner_err("make-link", link))
    }

    fn remove_file(&self, path: &Path) -> RunnerResult {
        Cmd::new("rm")
            .arg("-f")
            .arg_path(path)
            .sudo()
            .run()
            .map(|_| ())
            .map_err(runner_err("remove-file", path))
    }

    fn read_file(&self, path: &Path) -> RunnerResult<String> {
        Cmd::new("cat")
            .arg_path(path)
            .sudo()
            .run()
            .map(|result| result.stdout)
            .map_err(runner_err("read-file", path))
    }

    fn generate_keypair(&self, key_path: &Path) -> RunnerResult {
        Cmd::new("ssh-keygen")
            .args(["-q", "-t", "rsa", "-b", "4096", "-N", ""])
            .arg("-f")
            .arg_path(key_path)
            .sudo()
            .error_msg("ssh-keygen failed")
            .run()
            .map(|_| ())
            .map_err(runner_err("generate-keypair", key_path))
    }

    fn entry_exists(&self, path: &Path) -> RunnerResult<bool> {
        let result = Cmd::new("test")
            .arg("-e")
            .arg_path(path)
            .sudo()
            .allow_fail()
            .run()
            .map_err(runner_err("probe-entry", path))?;
        Ok(result.success())
    }
}
