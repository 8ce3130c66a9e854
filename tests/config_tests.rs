//! Tests for configuration loading and the host path layout.

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

use devprov::config::{validate_username, ProvisionSpec};
use devprov::context::ProvisionContext;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.yml");
    fs::write(&path, content).expect("write config");
    path
}

// =============================================================================
// ProvisionSpec
// =============================================================================

#[test]
fn loads_developers_and_project_from_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "devs: \"alice, bob ,carol\"\nproject: webapp\n");

    let spec = ProvisionSpec::load(&path).expect("load should succeed");

    assert_eq!(spec.developers, ["alice", "bob", "carol"]);
    assert_eq!(spec.project.as_deref(), Some("webapp"));
}

#[test]
fn missing_project_key_means_no_shared_project() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "devs: \"alice\"\n");

    let spec = ProvisionSpec::load(&path).expect("load should succeed");

    assert_eq!(spec.developers, ["alice"]);
    assert!(spec.project.is_none());
}

#[test]
fn empty_and_whitespace_names_are_dropped() {
    let spec = ProvisionSpec::from_parts("alice,, bob ,", None).expect("should succeed");
    assert_eq!(spec.developers, ["alice", "bob"]);

    let spec = ProvisionSpec::from_parts("", None).expect("should succeed");
    assert!(spec.developers.is_empty());
}

#[test]
fn illegal_developer_name_is_a_config_error() {
    assert!(ProvisionSpec::from_parts("alice,Bad Name", None).is_err());
    assert!(ProvisionSpec::from_parts("../etc", None).is_err());
}

#[test]
fn project_name_must_be_a_single_path_component() {
    assert!(ProvisionSpec::from_parts("alice", Some("../evil".to_string())).is_err());
    assert!(ProvisionSpec::from_parts("alice", Some("a/b".to_string())).is_err());
    // A blank project name just means no shared project.
    let spec = ProvisionSpec::from_parts("alice", Some("  ".to_string())).unwrap();
    assert!(spec.project.is_none());
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(ProvisionSpec::load(&dir.path().join("nope.yml")).is_err());
}

#[test]
fn invalid_yaml_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "devs: [unterminated\n");
    assert!(ProvisionSpec::load(&path).is_err());
}

#[test]
fn username_validation_rules() {
    assert!(validate_username("alice").is_ok());
    assert!(validate_username("_svc-build").is_ok());
    assert!(validate_username("dev1").is_ok());

    assert!(validate_username("Alice").is_err());
    assert!(validate_username("1dev").is_err());
    assert!(validate_username("a b").is_err());
    assert!(validate_username(&"a".repeat(33)).is_err());
}

// =============================================================================
// ProvisionContext
// =============================================================================

#[test]
#[serial]
fn context_defaults_match_a_stock_host() {
    for var in [
        "DEVPROV_HOME_ROOT",
        "DEVPROV_SUDOERS_DIR",
        "DEVPROV_PROJECT_ROOT",
        "DEVPROV_LOGIN_SHELL",
    ] {
        std::env::remove_var(var);
    }

    let ctx = ProvisionContext::load();

    assert_eq!(ctx.home("alice"), PathBuf::from("/home/alice"));
    assert_eq!(ctx.ssh_dir("alice"), PathBuf::from("/home/alice/.ssh"));
    assert_eq!(
        ctx.private_key("alice"),
        PathBuf::from("/home/alice/.ssh/id_rsa")
    );
    assert_eq!(
        ctx.sudoers_file("alice"),
        PathBuf::from("/etc/sudoers.d/alice")
    );
    assert_eq!(ctx.project_dir("webapp"), PathBuf::from("/opt/webapp"));
    assert_eq!(
        ctx.user_public_link("alice", "webapp"),
        PathBuf::from("/home/alice/webapp/public")
    );
    assert_eq!(ctx.login_shell, "/bin/bash");
}

#[test]
#[serial]
fn context_roots_are_overridable_from_the_environment() {
    std::env::set_var("DEVPROV_HOME_ROOT", "/srv/homes");
    std::env::set_var("DEVPROV_SUDOERS_DIR", "/tmp/sudoers.d");
    std::env::set_var("DEVPROV_PROJECT_ROOT", "/srv/projects");
    std::env::set_var("DEVPROV_LOGIN_SHELL", "/bin/zsh");

    let ctx = ProvisionContext::load();

    assert_eq!(ctx.home("bob"), PathBuf::from("/srv/homes/bob"));
    assert_eq!(ctx.sudoers_file("bob"), PathBuf::from("/tmp/sudoers.d/bob"));
    assert_eq!(ctx.public_dir("webapp"), PathBuf::from("/srv/projects/webapp/public"));
    assert_eq!(ctx.login_shell, "/bin/zsh");

    for var in [
        "DEVPROV_HOME_ROOT",
        "DEVPROV_SUDOERS_DIR",
        "DEVPROV_PROJECT_ROOT",
        "DEVPROV_LOGIN_SHELL",
    ] {
        std::env::remove_var(var);
    }
}
