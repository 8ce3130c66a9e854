//! Tests for the per-developer stages: sudo grants, SSH credentials, and
//! account creation, driven against the recording fake runner.

mod helpers;

use helpers::{test_context, FakeRunner, Op, FAKE_KEY_MATERIAL};

use devprov::account;
use devprov::error::{ProvisionError, Stage};
use devprov::sshkeys;
use devprov::sudoers;

// =============================================================================
// sudoers tests
// =============================================================================

#[test]
fn sudo_grant_writes_exactly_one_rule() {
    let runner = FakeRunner::new();
    let ctx = test_context();

    sudoers::grant(&runner, &ctx, "alice").expect("grant should succeed");

    let path = ctx.sudoers_file("alice");
    assert_eq!(
        runner.file_content(&path).as_deref(),
        Some("alice ALL=(ALL) NOPASSWD:ALL\n")
    );
    assert_eq!(runner.mode_of(&path), Some(0o440));
}

#[test]
fn sudo_grant_restricts_immediately_after_write() {
    let runner = FakeRunner::new();
    let ctx = test_context();

    sudoers::grant(&runner, &ctx, "alice").expect("grant should succeed");

    // Nothing may run between the rule write and the mode restriction.
    let ops = runner.ops();
    assert_eq!(ops.len(), 2);
    assert!(matches!(&ops[0], Op::WriteFile { path, .. } if *path == ctx.sudoers_file("alice")));
    assert!(matches!(&ops[1], Op::SetMode { path, mode: 0o440 } if *path == ctx.sudoers_file("alice")));
}

#[test]
fn sudo_grant_reports_write_failure() {
    let runner = FakeRunner::new();
    let ctx = test_context();
    runner.fail_on("set-file-content", "alice");

    let err = sudoers::grant(&runner, &ctx, "alice").unwrap_err();

    assert!(matches!(err, ProvisionError::GrantWrite { .. }));
    assert_eq!(err.stage(), Stage::SudoGrant);
    // The restriction step never ran.
    assert_eq!(runner.count_ops("set-permission"), 0);
}

#[test]
fn sudo_grant_reports_restriction_failure() {
    let runner = FakeRunner::new();
    let ctx = test_context();
    runner.fail_on("set-permission", "sudoers.d/alice");

    let err = sudoers::grant(&runner, &ctx, "alice").unwrap_err();

    assert!(matches!(err, ProvisionError::GrantPermission { .. }));
}

// =============================================================================
// sshkeys tests
// =============================================================================

#[test]
fn ssh_provision_produces_locked_down_credentials() {
    let runner = FakeRunner::new();
    let ctx = test_context();
    runner.seed_account("alice");

    let key = sshkeys::provision(&runner, &ctx, "alice").expect("provision should succeed");

    let ssh_dir = ctx.ssh_dir("alice");
    assert_eq!(runner.mode_of(&ssh_dir), Some(0o700));
    assert_eq!(
        runner.owner_of(&ssh_dir),
        Some(("alice".to_string(), "alice".to_string()))
    );
    assert_eq!(runner.mode_of(&ctx.private_key("alice")), Some(0o600));
    assert_eq!(runner.mode_of(&ctx.authorized_keys("alice")), Some(0o600));
    assert_eq!(
        runner.file_content(&ctx.authorized_keys("alice")).as_deref(),
        Some("")
    );
    // The public half must not survive provisioning.
    assert!(!runner.exists(&ctx.public_key("alice")));
    assert_eq!(key.expose(), FAKE_KEY_MATERIAL);
}

#[test]
fn ssh_provision_orders_ownership_before_restriction() {
    let runner = FakeRunner::new();
    let ctx = test_context();
    runner.seed_account("alice");

    sshkeys::provision(&runner, &ctx, "alice").expect("provision should succeed");

    let ops = runner.ops();
    assert!(matches!(&ops[0], Op::MakeDir { path } if *path == ctx.ssh_dir("alice")));
    assert!(matches!(&ops[1], Op::GenerateKeypair { path } if *path == ctx.private_key("alice")));
    assert!(matches!(
        &ops[2],
        Op::SetOwner {
            recursive: true,
            owner,
            ..
        } if owner == "alice"
    ));
    // The very last operation reads the key material back.
    assert!(matches!(
        ops.last(),
        Some(Op::ReadFile { path }) if *path == ctx.private_key("alice")
    ));
}

#[test]
fn ssh_provision_aborts_remaining_steps_on_failure() {
    let runner = FakeRunner::new();
    let ctx = test_context();
    runner.seed_account("alice");
    runner.fail_on("set-permission", "id_rsa.pub");

    let err = sshkeys::provision(&runner, &ctx, "alice").unwrap_err();

    assert!(matches!(err, ProvisionError::Credential { .. }));
    assert_eq!(err.stage(), Stage::CredentialProvisioning);
    // Later steps never ran: no authorized-keys write, no public key removal.
    assert_eq!(runner.count_ops("set-file-content"), 0);
    assert_eq!(runner.count_ops("remove-file"), 0);
    assert!(runner.exists(&ctx.public_key("alice")));
}

#[test]
fn ssh_private_key_debug_is_redacted() {
    let runner = FakeRunner::new();
    let ctx = test_context();
    runner.seed_account("alice");

    let key = sshkeys::provision(&runner, &ctx, "alice").expect("provision should succeed");

    let debug = format!("{:?}", key);
    assert!(!debug.contains("fake-key-material"));
    assert!(debug.contains("redacted"));
}

// =============================================================================
// account tests
// =============================================================================

#[test]
fn create_developer_runs_all_stages() {
    let runner = FakeRunner::new();
    let ctx = test_context();

    let key = account::create_developer(&runner, &ctx, "bob").expect("should succeed");

    assert_eq!(key.expose(), FAKE_KEY_MATERIAL);
    let ops = runner.ops();
    assert!(matches!(
        &ops[0],
        Op::CreateAccount { name, shell } if name == "bob" && shell == "/bin/bash"
    ));
    assert_eq!(runner.mode_of(&ctx.sudoers_file("bob")), Some(0o440));
    assert_eq!(runner.mode_of(&ctx.ssh_dir("bob")), Some(0o700));
}

#[test]
fn create_developer_fails_on_duplicate_account() {
    let runner = FakeRunner::new();
    let ctx = test_context();
    runner.seed_account("bob");

    let err = account::create_developer(&runner, &ctx, "bob").unwrap_err();

    assert!(matches!(err, ProvisionError::AccountCreation { .. }));
    assert_eq!(err.stage(), Stage::AccountCreation);
    // Short-circuit: no sudo or SSH operation was attempted.
    assert_eq!(runner.ops().len(), 1);
}

#[test]
fn create_developer_stops_after_failed_grant() {
    let runner = FakeRunner::new();
    let ctx = test_context();
    runner.fail_on("set-file-content", "sudoers.d/bob");

    let err = account::create_developer(&runner, &ctx, "bob").unwrap_err();

    assert_eq!(err.stage(), Stage::SudoGrant);
    // The account exists (no rollback) but SSH provisioning never started.
    assert_eq!(runner.count_ops("generate-keypair"), 0);
    assert_eq!(runner.count_ops("make-directory"), 0);
}
