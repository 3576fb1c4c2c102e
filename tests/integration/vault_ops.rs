//! Facade-level scenarios: argument shapes, credential lifecycle, and
//! failure classification through [`Vault`].

use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use vaultwrap::vault::BINARY_ENV_VAR;
use vaultwrap::{Secret, Vault, VaultConfig, VaultError};

use super::helpers::*;

fn vault_with_stub(stub: &Path) -> Vault {
    Vault::new(VaultConfig {
        binary: Some(stub.to_string_lossy().into_owned()),
        ..Default::default()
    })
    .expect("stub vault should construct")
}

fn password(value: &str) -> Secret {
    Secret::Password(value.to_string())
}

#[test]
fn test_construction_probes_the_binary() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());

    let vault = vault_with_stub(&stub);
    assert_eq!(vault.binary(), stub.to_string_lossy());
    assert!(dir.path().join("version-probes").exists());
    // The probe is not an operation.
    assert!(never_invoked(dir.path()));
}

#[test]
fn test_missing_binary_is_tool_not_found() {
    let err = Vault::new(VaultConfig {
        binary: Some("/nonexistent/ansible-vault".to_string()),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, VaultError::ToolNotFound));
}

#[test]
fn test_failed_probe_is_tool_not_found() {
    let dir = TempDir::new().unwrap();
    let stub = write_stub(dir.path(), "#!/bin/sh\nexit 1\n");

    let err = Vault::new(VaultConfig {
        binary: Some(stub.to_string_lossy().into_owned()),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, VaultError::ToolNotFound));
}

#[test]
#[serial]
fn test_env_var_selects_binary() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());

    std::env::set_var(BINARY_ENV_VAR, &stub);
    let vault = Vault::new(VaultConfig::default()).unwrap();
    std::env::remove_var(BINARY_ENV_VAR);

    assert_eq!(vault.binary(), stub.to_string_lossy());
}

#[test]
#[serial]
fn test_explicit_binary_beats_env_var() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());

    std::env::set_var(BINARY_ENV_VAR, "/nonexistent/ansible-vault");
    let vault = Vault::new(VaultConfig {
        binary: Some(stub.to_string_lossy().into_owned()),
        ..Default::default()
    });
    std::env::remove_var(BINARY_ENV_VAR);

    assert!(vault.is_ok());
}

#[test]
fn test_encrypt_materializes_and_cleans_up_credential() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());
    let vault = vault_with_stub(&stub);

    let status = vault
        .encrypt("secrets.yml", Some(&password("hunter2")), None)
        .unwrap();
    assert_eq!(status, "Encryption successful");

    let args = last_args(dir.path());
    assert_eq!(args[0], "encrypt");
    assert_eq!(args[1], "--vault-password-file");
    assert_eq!(args.last().unwrap(), "secrets.yml");

    // The stub saw the password through the materialized file...
    assert_eq!(last_password(dir.path()), "hunter2");
    // ...the password itself never appeared in argv...
    assert!(!args.iter().any(|a| a.contains("hunter2")));
    // ...and the file is gone once the call returns.
    assert!(!PathBuf::from(&args[2]).exists());
}

#[test]
fn test_encrypt_passes_vault_id() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());
    let vault = vault_with_stub(&stub);

    vault
        .encrypt("secrets.yml", Some(&password("pw")), Some("dev"))
        .unwrap();

    let args = last_args(dir.path());
    let id_pos = args.iter().position(|a| a == "--vault-id").unwrap();
    assert_eq!(args[id_pos + 1], "dev");
}

#[test]
fn test_caller_supplied_password_file_is_passed_through() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());
    let vault = vault_with_stub(&stub);

    let passfile = dir.path().join("team-vault-pass");
    fs::write(&passfile, "filepw").unwrap();

    vault
        .encrypt("secrets.yml", Some(&Secret::File(passfile.clone())), None)
        .unwrap();

    let args = last_args(dir.path());
    assert_eq!(args[2], passfile.to_string_lossy());
    assert_eq!(last_password(dir.path()), "filepw");
    // Caller-managed files survive the call.
    assert!(passfile.exists());
}

#[test]
fn test_default_password_file_fallback() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());

    let passfile = dir.path().join("default-pass");
    fs::write(&passfile, "defaultpw").unwrap();

    let vault = Vault::new(VaultConfig {
        binary: Some(stub.to_string_lossy().into_owned()),
        password_file: Some(passfile.clone()),
        ..Default::default()
    })
    .unwrap();

    vault.encrypt("secrets.yml", None, None).unwrap();
    assert_eq!(last_password(dir.path()), "defaultpw");
}

#[test]
fn test_missing_credential_fails_before_spawning() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());
    let vault = vault_with_stub(&stub);

    let err = vault.encrypt("secrets.yml", None, None).unwrap_err();
    assert!(matches!(err, VaultError::InvalidArgument(_)));
    assert!(never_invoked(dir.path()));
}

#[test]
fn test_encrypt_string_delivers_plaintext_over_stdin() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());
    let vault = vault_with_stub(&stub);

    let vault_text = vault
        .encrypt_string("api-token-value", Some(&password("pw")), None, Some("api_token"))
        .unwrap();

    assert!(vault_text.starts_with("$ANSIBLE_VAULT;1.1;AES256"));
    assert_eq!(last_stdin(dir.path()), "api-token-value");

    let args = last_args(dir.path());
    assert_eq!(args[0], "encrypt_string");
    assert_eq!(args[1], "--stdin");
    let name_pos = args.iter().position(|a| a == "--name").unwrap();
    assert_eq!(args[name_pos + 1], "api_token");
    // The plaintext never rides in argv.
    assert!(!args.iter().any(|a| a.contains("api-token-value")));
}

#[test]
fn test_decrypt_string_round_trips_over_stdin() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());
    let vault = vault_with_stub(&stub);

    let plaintext = vault
        .decrypt_string("$ANSIBLE_VAULT;1.1;AES256;ciphertext", Some(&password("pw")), None)
        .unwrap();

    assert_eq!(plaintext, "plain:$ANSIBLE_VAULT;1.1;AES256;ciphertext");
    let args = last_args(dir.path());
    assert_eq!(args[0], "decrypt");
    assert_eq!(args[1], "--stdin");
}

#[test]
fn test_view_builds_expected_command() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());
    let vault = vault_with_stub(&stub);

    vault.view("secrets.yml", Some(&password("pw")), None).unwrap();

    let args = last_args(dir.path());
    assert_eq!(args[0], "view");
    assert_eq!(args.last().unwrap(), "secrets.yml");
}

#[test]
fn test_create_encrypted_uses_new_password_flag() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());
    let vault = vault_with_stub(&stub);

    vault.create("fresh.yml", Some(&password("newpw")), true).unwrap();

    let args = last_args(dir.path());
    assert_eq!(args[0], "create");
    assert_eq!(args[1], "--new-vault-password-file");
    assert_eq!(last_new_password(dir.path()), "newpw");
}

#[test]
fn test_create_plaintext_takes_no_credential() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());
    let vault = vault_with_stub(&stub);

    vault.create("notes.yml", None, false).unwrap();
    assert_eq!(last_args(dir.path()), ["create", "notes.yml"]);
}

#[test]
fn test_create_encrypted_without_credential_fails_fast() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());
    let vault = vault_with_stub(&stub);

    let err = vault.create("fresh.yml", None, true).unwrap_err();
    assert!(matches!(err, VaultError::InvalidArgument(_)));
    assert!(never_invoked(dir.path()));
}

#[test]
fn test_rekey_passes_old_and_new_credentials() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());
    let vault = vault_with_stub(&stub);

    vault
        .rekey("secrets.yml", Some(&password("oldpw")), Some(&password("newpw")), None)
        .unwrap();

    let args = last_args(dir.path());
    assert_eq!(args[0], "rekey");
    assert_eq!(args[1], "--vault-password-file");
    assert_eq!(args[3], "--new-vault-password-file");
    assert_eq!(last_password(dir.path()), "oldpw");
    assert_eq!(last_new_password(dir.path()), "newpw");

    // Both materialized files are removed once the call returns.
    assert!(!PathBuf::from(&args[2]).exists());
    assert!(!PathBuf::from(&args[4]).exists());
}

#[test]
fn test_remove_deletes_the_file() {
    let dir = TempDir::new().unwrap();
    let stub = recording_stub(dir.path());
    let vault = vault_with_stub(&stub);

    let target = dir.path().join("doomed.yml");
    fs::write(&target, "$ANSIBLE_VAULT;1.1;AES256\n").unwrap();

    vault.remove(&target).unwrap();
    assert!(!target.exists());

    let err = vault.remove(&target).unwrap_err();
    assert!(matches!(err, VaultError::Resource { .. }));
}

#[test]
fn test_auth_failure_is_classified_and_scrubbed() {
    let dir = TempDir::new().unwrap();
    let stub = failing_stub(dir.path(), 4, "Decryption failed");
    let vault = Vault::new(VaultConfig {
        binary: Some(stub.to_string_lossy().into_owned()),
        ..Default::default()
    })
    .unwrap();

    let err = vault
        .decrypt("secrets.yml", Some(&password("supersecret")), None)
        .unwrap_err();

    assert!(matches!(err, VaultError::Auth(_)));
    assert_eq!(err.exit_code(), Some(4));

    let message = err.to_string();
    assert!(message.contains("exit code 4"));
    assert!(!message.contains("supersecret"));
    // The credential file path is sensitive too; it is masked with the rest.
    assert!(!message.contains("vault-pass-"), "message: {message}");
}

#[test]
fn test_usage_failure_is_classified() {
    let dir = TempDir::new().unwrap();
    let stub = failing_stub(dir.path(), 2, "usage: ansible-vault [-h]");
    let vault = Vault::new(VaultConfig {
        binary: Some(stub.to_string_lossy().into_owned()),
        ..Default::default()
    })
    .unwrap();

    let err = vault
        .encrypt("secrets.yml", Some(&password("pw")), None)
        .unwrap_err();
    assert!(matches!(err, VaultError::CliUsage(_)));
    assert_eq!(err.failure().unwrap().stderr, "usage: ansible-vault [-h]\n");
}

#[test]
fn test_hanging_tool_times_out() {
    let dir = TempDir::new().unwrap();
    let stub = hanging_stub(dir.path());
    let vault = Vault::new(VaultConfig {
        binary: Some(stub.to_string_lossy().into_owned()),
        timeout: Some(Duration::from_millis(200)),
        ..Default::default()
    })
    .unwrap();

    let err = vault
        .encrypt("secrets.yml", Some(&password("pw")), None)
        .unwrap_err();
    assert!(matches!(err, VaultError::Timeout { .. }));
}
