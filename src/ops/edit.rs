//! Interactive editing of vault files.

use std::path::Path;

use super::{push_password_file, push_path, push_vault_id, PASSWORD_FILE_FLAG};
use crate::credentials::{resolve_secret, Secret};
use crate::error::Result;
use crate::exec::{CommandExecutor, ExecOptions};

/// Builder for the `edit` subcommand.
pub struct Editor<'a> {
    executor: &'a CommandExecutor,
    binary: &'a str,
}

impl<'a> Editor<'a> {
    pub fn new(executor: &'a CommandExecutor, binary: &'a str) -> Self {
        Self { executor, binary }
    }

    /// Open a vault file in the tool's editor session. The child inherits
    /// the terminal, so nothing is captured and no deadline applies.
    pub fn edit(&self, path: &Path, secret: Option<&Secret>, vault_id: Option<&str>) -> Result<()> {
        let cred = resolve_secret(secret, "password or vault password file is required to edit")?;

        let mut command = vec![self.binary.to_string(), "edit".to_string()];
        push_password_file(&mut command, PASSWORD_FILE_FLAG, &cred);
        push_vault_id(&mut command, vault_id);
        push_path(&mut command, path);

        let options = ExecOptions {
            interactive: true,
            ..Default::default()
        };

        self.executor.execute_with(&command, options)?;
        Ok(())
    }
}
