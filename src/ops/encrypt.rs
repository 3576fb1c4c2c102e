//! Encryption, decryption and viewing of vault files and strings.

use std::path::Path;

use super::{push_password_file, push_path, push_vault_id, PASSWORD_FILE_FLAG};
use crate::credentials::{resolve_secret, Secret};
use crate::error::Result;
use crate::exec::{CommandExecutor, ExecOptions};

/// Builder for the `encrypt`/`decrypt`/`encrypt_string`/`view` subcommands.
pub struct Encrypter<'a> {
    executor: &'a CommandExecutor,
    binary: &'a str,
}

impl<'a> Encrypter<'a> {
    pub fn new(executor: &'a CommandExecutor, binary: &'a str) -> Self {
        Self { executor, binary }
    }

    /// Encrypt a file in place. Returns the tool's trimmed status output.
    pub fn encrypt(
        &self,
        target: &Path,
        secret: Option<&Secret>,
        vault_id: Option<&str>,
    ) -> Result<String> {
        let cred = resolve_secret(secret, "password or vault password file is required to encrypt")?;

        let mut command = vec![self.binary.to_string(), "encrypt".to_string()];
        push_password_file(&mut command, PASSWORD_FILE_FLAG, &cred);
        push_vault_id(&mut command, vault_id);
        push_path(&mut command, target);

        Ok(self.executor.execute(&command)?.trim().to_string())
    }

    /// Encrypt an in-memory string, delivered over stdin so the plaintext
    /// never appears in a process listing. Returns the trimmed vault text.
    pub fn encrypt_string(
        &self,
        plaintext: &str,
        secret: Option<&Secret>,
        vault_id: Option<&str>,
        name: &str,
    ) -> Result<String> {
        let cred = resolve_secret(secret, "password or vault password file is required to encrypt")?;

        let mut command = vec![
            self.binary.to_string(),
            "encrypt_string".to_string(),
            "--stdin".to_string(),
            "--name".to_string(),
            name.to_string(),
        ];
        push_password_file(&mut command, PASSWORD_FILE_FLAG, &cred);
        push_vault_id(&mut command, vault_id);

        let options = ExecOptions {
            stdin: Some(plaintext.as_bytes().to_vec()),
            ..Default::default()
        };

        Ok(self.executor.execute_with(&command, options)?.trim().to_string())
    }

    /// Decrypt a file in place. Returns the tool's trimmed status output.
    pub fn decrypt(
        &self,
        target: &Path,
        secret: Option<&Secret>,
        vault_id: Option<&str>,
    ) -> Result<String> {
        let cred = resolve_secret(secret, "password or vault password file is required to decrypt")?;

        let mut command = vec![self.binary.to_string(), "decrypt".to_string()];
        push_password_file(&mut command, PASSWORD_FILE_FLAG, &cred);
        push_vault_id(&mut command, vault_id);
        push_path(&mut command, target);

        Ok(self.executor.execute(&command)?.trim().to_string())
    }

    /// Decrypt an in-memory vault string, delivered over stdin. Returns the
    /// trimmed plaintext.
    pub fn decrypt_string(
        &self,
        vault_text: &str,
        secret: Option<&Secret>,
        vault_id: Option<&str>,
    ) -> Result<String> {
        let cred = resolve_secret(secret, "password or vault password file is required to decrypt")?;

        let mut command = vec![
            self.binary.to_string(),
            "decrypt".to_string(),
            "--stdin".to_string(),
        ];
        push_password_file(&mut command, PASSWORD_FILE_FLAG, &cred);
        push_vault_id(&mut command, vault_id);

        let options = ExecOptions {
            stdin: Some(vault_text.as_bytes().to_vec()),
            ..Default::default()
        };

        Ok(self.executor.execute_with(&command, options)?.trim().to_string())
    }

    /// Print the decrypted content of a vault file without modifying it.
    pub fn view(
        &self,
        path: &Path,
        secret: Option<&Secret>,
        vault_id: Option<&str>,
    ) -> Result<String> {
        let cred = resolve_secret(secret, "password or vault password file is required to view")?;

        let mut command = vec![self.binary.to_string(), "view".to_string()];
        push_password_file(&mut command, PASSWORD_FILE_FLAG, &cred);
        push_vault_id(&mut command, vault_id);
        push_path(&mut command, path);

        Ok(self.executor.execute(&command)?.trim().to_string())
    }
}
