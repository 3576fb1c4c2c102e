//! Per-operation argument assembly for the external tool.
//!
//! Each builder owns the argument-vector shape of one subcommand family and
//! hands the finished vector to the execution facade. Credential material is
//! always referenced by file path, never inlined into the vector.

pub mod edit;
pub mod encrypt;
pub mod manage;
pub mod rekey;

pub use edit::Editor;
pub use encrypt::Encrypter;
pub use manage::VaultManager;
pub use rekey::Rekeyer;

use std::path::Path;

use crate::credentials::CredSource;

/// Flag used to hand the current password file to the tool.
pub(crate) const PASSWORD_FILE_FLAG: &str = "--vault-password-file";
/// Flag used to hand the replacement password file to the tool.
pub(crate) const NEW_PASSWORD_FILE_FLAG: &str = "--new-vault-password-file";

pub(crate) fn push_password_file(command: &mut Vec<String>, flag: &str, cred: &CredSource) {
    command.push(flag.to_string());
    command.push(cred.path().to_string_lossy().into_owned());
}

pub(crate) fn push_vault_id(command: &mut Vec<String>, vault_id: Option<&str>) {
    if let Some(id) = vault_id {
        command.push("--vault-id".to_string());
        command.push(id.to_string());
    }
}

pub(crate) fn push_path(command: &mut Vec<String>, path: &Path) {
    command.push(path.to_string_lossy().into_owned());
}
