//! Host path layout for provisioning.
//!
//! Defaults match a stock Linux host; each root is overridable through the
//! environment (or a `.env` file loaded by the binary) so tests and
//! non-standard hosts can redirect the layout:
//!
//! - `DEVPROV_HOME_ROOT` (default `/home`)
//! - `DEVPROV_SUDOERS_DIR` (default `/etc/sudoers.d`)
//! - `DEVPROV_PROJECT_ROOT` (default `/opt`)
//! - `DEVPROV_LOGIN_SHELL` (default `/bin/bash`)

use std::path::PathBuf;

pub const DEFAULT_HOME_ROOT: &str = "/home";
pub const DEFAULT_SUDOERS_DIR: &str = "/etc/sudoers.d";
pub const DEFAULT_PROJECT_ROOT: &str = "/opt";
pub const DEFAULT_LOGIN_SHELL: &str = "/bin/bash";

/// Where provisioned resources live on the host.
#[derive(Debug, Clone)]
pub struct ProvisionContext {
    /// Parent of all developer home directories.
    pub home_root: PathBuf,
    /// Directory holding per-account sudoers drop-in files.
    pub sudoers_dir: PathBuf,
    /// Parent of shared project directories.
    pub project_root: PathBuf,
    /// Login shell for new accounts.
    pub login_shell: String,
}

impl Default for ProvisionContext {
    fn default() -> Self {
        Self {
            home_root: PathBuf::from(DEFAULT_HOME_ROOT),
            sudoers_dir: PathBuf::from(DEFAULT_SUDOERS_DIR),
            project_root: PathBuf::from(DEFAULT_PROJECT_ROOT),
            login_shell: DEFAULT_LOGIN_SHELL.to_string(),
        }
    }
}

impl ProvisionContext {
    /// Build the context from environment overrides, falling back to defaults.
    pub fn load() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            home_root: var("DEVPROV_HOME_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME_ROOT)),
            sudoers_dir: var("DEVPROV_SUDOERS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SUDOERS_DIR)),
            project_root: var("DEVPROV_PROJECT_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_ROOT)),
            login_shell: var("DEVPROV_LOGIN_SHELL")
                .unwrap_or_else(|| DEFAULT_LOGIN_SHELL.to_string()),
        }
    }

    /// Home directory of a developer account.
    pub fn home(&self, user: &str) -> PathBuf {
        self.home_root.join(user)
    }

    /// `.ssh` directory inside a developer's home.
    pub fn ssh_dir(&self, user: &str) -> PathBuf {
        self.home(user).join(".ssh")
    }

    /// Private key path for a developer.
    pub fn private_key(&self, user: &str) -> PathBuf {
        self.ssh_dir(user).join("id_rsa")
    }

    /// Public key path as left behind by key generation.
    pub fn public_key(&self, user: &str) -> PathBuf {
        self.ssh_dir(user).join("id_rsa.pub")
    }

    /// Authorized-keys file for a developer.
    pub fn authorized_keys(&self, user: &str) -> PathBuf {
        self.ssh_dir(user).join("authorized_keys")
    }

    /// Sudoers drop-in file for a developer.
    pub fn sudoers_file(&self, user: &str) -> PathBuf {
        self.sudoers_dir.join(user)
    }

    /// Root directory of a shared project.
    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.project_root.join(project)
    }

    /// Shared public directory inside a project.
    pub fn public_dir(&self, project: &str) -> PathBuf {
        self.project_dir(project).join("public")
    }

    /// A developer's own project directory.
    pub fn user_project_dir(&self, user: &str, project: &str) -> PathBuf {
        self.home(user).join(project)
    }

    /// The `public` link inside a developer's project directory.
    pub fn user_public_link(&self, user: &str, project: &str) -> PathBuf {
        self.user_project_dir(user, project).join("public")
    }
}
