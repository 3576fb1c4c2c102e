//! Creation and removal of vault files.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::{push_password_file, push_path, NEW_PASSWORD_FILE_FLAG};
use crate::credentials::{resolve_secret, Secret};
use crate::error::{Result, VaultError};
use crate::exec::CommandExecutor;

/// Builder for the `create` subcommand plus local file removal.
pub struct VaultManager<'a> {
    executor: &'a CommandExecutor,
    binary: &'a str,
}

impl<'a> VaultManager<'a> {
    pub fn new(executor: &'a CommandExecutor, binary: &'a str) -> Self {
        Self { executor, binary }
    }

    /// Create a new vault file. An encrypted vault needs a credential; a
    /// plaintext file (`encrypted: false`) takes none.
    pub fn create(&self, path: &Path, secret: Option<&Secret>, encrypted: bool) -> Result<()> {
        let mut command = vec![self.binary.to_string(), "create".to_string()];

        // Resolved before anything is spawned; the credential file lives
        // until the command has finished.
        let _cred = if encrypted {
            let cred = resolve_secret(
                secret,
                "password or vault password file is required to create an encrypted vault",
            )?;
            push_password_file(&mut command, NEW_PASSWORD_FILE_FLAG, &cred);
            Some(cred)
        } else {
            None
        };

        push_path(&mut command, path);
        self.executor.execute(&command)?;
        Ok(())
    }

    /// Delete a vault file. Deleting a file that is already gone is an error.
    pub fn remove(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|source| VaultError::Resource {
            context: match source.kind() {
                ErrorKind::NotFound => "vault file does not exist",
                _ => "failed to remove vault file",
            },
            source,
        })
    }
}
