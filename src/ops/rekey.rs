//! Re-encryption of vault files under a new password.

use std::path::Path;

use super::{push_password_file, push_path, push_vault_id, NEW_PASSWORD_FILE_FLAG, PASSWORD_FILE_FLAG};
use crate::credentials::{materialize, resolve_secret, Secret};
use crate::error::Result;
use crate::exec::CommandExecutor;

/// Builder for the `rekey` subcommand.
pub struct Rekeyer<'a> {
    executor: &'a CommandExecutor,
    binary: &'a str,
}

impl<'a> Rekeyer<'a> {
    pub fn new(executor: &'a CommandExecutor, binary: &'a str) -> Self {
        Self { executor, binary }
    }

    /// Rekey a vault file: the old credential unlocks it, the new one (when
    /// given) becomes its password. Both credential files stay alive until
    /// the command has finished.
    pub fn rekey(
        &self,
        path: &Path,
        old_secret: Option<&Secret>,
        new_secret: Option<&Secret>,
        vault_id: Option<&str>,
    ) -> Result<()> {
        let old_cred = resolve_secret(
            old_secret,
            "old password or vault password file is required to rekey",
        )?;
        let new_cred = new_secret.map(materialize).transpose()?;

        let mut command = vec![self.binary.to_string(), "rekey".to_string()];
        push_password_file(&mut command, PASSWORD_FILE_FLAG, &old_cred);
        if let Some(cred) = &new_cred {
            push_password_file(&mut command, NEW_PASSWORD_FILE_FLAG, cred);
        }
        push_vault_id(&mut command, vault_id);
        push_path(&mut command, path);

        self.executor.execute(&command)?;
        Ok(())
    }
}
