//! Provisioning run configuration.
//!
//! Reads a YAML file of the form:
//!
//! ```yaml
//! devs: "alice, bob, carol"
//! project: webapp
//! ```
//!
//! `devs` is a comma-separated list of account names; `project` is optional.
//! Names are trimmed and empties dropped, so `"alice,,bob,"` yields two
//! developers. An empty resulting list is not an error here; the caller
//! decides that nothing needs provisioning.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Maximum length `useradd` accepts for an account name.
const MAX_USERNAME_LEN: usize = 32;

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    devs: Option<String>,
    #[serde(default)]
    project: Option<String>,
}

/// What a provisioning run should create.
#[derive(Debug, Clone)]
pub struct ProvisionSpec {
    /// Developer account names, in configuration order.
    pub developers: Vec<String>,
    /// Optional shared project name.
    pub project: Option<String>,
}

impl ProvisionSpec {
    /// Load and validate a spec from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let raw: RawConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?;
        Self::from_parts(raw.devs.as_deref().unwrap_or(""), raw.project)
    }

    /// Build a spec from the raw `devs` string and optional project name.
    pub fn from_parts(devs: &str, project: Option<String>) -> Result<Self> {
        let mut developers = Vec::new();
        for name in devs.split(',') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            validate_username(name)?;
            developers.push(name.to_string());
        }

        let project = project
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        if let Some(name) = &project {
            validate_project_name(name)?;
        }

        Ok(Self {
            developers,
            project,
        })
    }
}

/// Check that `name` is a legal account name for `useradd`.
///
/// Portable rules: starts with a lowercase letter or underscore, continues
/// with lowercase letters, digits, underscores, or hyphens, at most 32
/// characters.
pub fn validate_username(name: &str) -> Result<()> {
    if name.len() > MAX_USERNAME_LEN {
        bail!(
            "Developer name '{}' is longer than {} characters",
            name,
            MAX_USERNAME_LEN
        );
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => bail!(
            "Developer name '{}' must start with a lowercase letter or underscore",
            name
        ),
    }
    for c in chars {
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-') {
            bail!(
                "Developer name '{}' contains illegal character '{}'",
                name,
                c
            );
        }
    }
    Ok(())
}

/// Check that a project name is a single safe path component.
fn validate_project_name(name: &str) -> Result<()> {
    if name == "." || name == ".." || name.contains('/') || name.contains('\0') {
        bail!("Project name '{}' is not a valid directory name", name);
    }
    Ok(())
}
