//! High-level facade over the ansible-vault CLI.
//!
//! Resolves the external binary, probes its availability once at
//! construction, and exposes one method per vault operation. Operations
//! called without a credential fall back to the configured default password
//! file before failing.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use which::which;

use crate::credentials::Secret;
use crate::error::{Result, VaultError};
use crate::exec::CommandExecutor;
use crate::ops::{Editor, Encrypter, Rekeyer, VaultManager};

/// Environment variable selecting the external binary when no explicit path
/// is configured.
pub const BINARY_ENV_VAR: &str = "ANSIBLE_VAULT_BIN";
/// Name resolved on PATH when nothing else is configured.
pub const DEFAULT_BINARY: &str = "ansible-vault";

/// Construction-time settings for [`Vault`].
#[derive(Debug, Clone, Default)]
pub struct VaultConfig {
    /// Explicit binary path or name. Falls back to `ANSIBLE_VAULT_BIN`, then
    /// to `ansible-vault` on PATH.
    pub binary: Option<String>,
    /// Password file applied when an operation is called without a secret.
    pub password_file: Option<PathBuf>,
    /// Deadline for captured runs (default: 60 seconds).
    pub timeout: Option<Duration>,
}

#[derive(Debug)]
pub struct Vault {
    executor: CommandExecutor,
    binary: String,
    default_password_file: Option<PathBuf>,
}

impl Vault {
    /// Resolve the binary, verify it runs, and build the facade.
    pub fn new(config: VaultConfig) -> Result<Self> {
        let binary = config
            .binary
            .or_else(|| env::var(BINARY_ENV_VAR).ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_BINARY.to_string());

        let executor = match config.timeout {
            Some(timeout) => CommandExecutor::with_timeout(timeout),
            None => CommandExecutor::new(),
        };

        let vault = Self {
            executor,
            binary,
            default_password_file: config.password_file,
        };
        vault.ensure_available()?;
        Ok(vault)
    }

    /// `--version` probe. Any failure — binary absent, not executable, or a
    /// non-zero exit — is reported as the tool being unavailable.
    fn ensure_available(&self) -> Result<()> {
        if which(&self.binary).is_err() {
            return Err(VaultError::ToolNotFound);
        }

        let command = vec![self.binary.clone(), "--version".to_string()];
        match self.executor.execute(&command) {
            Ok(_) => Ok(()),
            Err(_) => Err(VaultError::ToolNotFound),
        }
    }

    /// The resolved binary this facade drives.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Create a new vault file at `path`.
    pub fn create(
        &self,
        path: impl AsRef<Path>,
        secret: Option<&Secret>,
        encrypted: bool,
    ) -> Result<()> {
        let secret = self.effective_secret(secret);
        VaultManager::new(&self.executor, &self.binary).create(
            path.as_ref(),
            secret.as_ref(),
            encrypted,
        )
    }

    /// Delete a vault file.
    pub fn remove(&self, path: impl AsRef<Path>) -> Result<()> {
        VaultManager::new(&self.executor, &self.binary).remove(path.as_ref())
    }

    /// Encrypt a file in place. Returns the tool's trimmed status output.
    pub fn encrypt(
        &self,
        target: impl AsRef<Path>,
        secret: Option<&Secret>,
        vault_id: Option<&str>,
    ) -> Result<String> {
        let secret = self.effective_secret(secret);
        Encrypter::new(&self.executor, &self.binary).encrypt(
            target.as_ref(),
            secret.as_ref(),
            vault_id,
        )
    }

    /// Encrypt an in-memory string into vault text. `name` labels the value
    /// in the produced YAML snippet (default: `secret`).
    pub fn encrypt_string(
        &self,
        plaintext: &str,
        secret: Option<&Secret>,
        vault_id: Option<&str>,
        name: Option<&str>,
    ) -> Result<String> {
        let secret = self.effective_secret(secret);
        Encrypter::new(&self.executor, &self.binary).encrypt_string(
            plaintext,
            secret.as_ref(),
            vault_id,
            name.unwrap_or("secret"),
        )
    }

    /// Decrypt a file in place. Returns the tool's trimmed status output.
    pub fn decrypt(
        &self,
        target: impl AsRef<Path>,
        secret: Option<&Secret>,
        vault_id: Option<&str>,
    ) -> Result<String> {
        let secret = self.effective_secret(secret);
        Encrypter::new(&self.executor, &self.binary).decrypt(
            target.as_ref(),
            secret.as_ref(),
            vault_id,
        )
    }

    /// Decrypt in-memory vault text back into its trimmed plaintext.
    pub fn decrypt_string(
        &self,
        vault_text: &str,
        secret: Option<&Secret>,
        vault_id: Option<&str>,
    ) -> Result<String> {
        let secret = self.effective_secret(secret);
        Encrypter::new(&self.executor, &self.binary).decrypt_string(
            vault_text,
            secret.as_ref(),
            vault_id,
        )
    }

    /// Print the decrypted content of a vault file without modifying it.
    pub fn view(
        &self,
        path: impl AsRef<Path>,
        secret: Option<&Secret>,
        vault_id: Option<&str>,
    ) -> Result<String> {
        let secret = self.effective_secret(secret);
        Encrypter::new(&self.executor, &self.binary).view(path.as_ref(), secret.as_ref(), vault_id)
    }

    /// Open a vault file in the tool's interactive editor session.
    pub fn edit(
        &self,
        path: impl AsRef<Path>,
        secret: Option<&Secret>,
        vault_id: Option<&str>,
    ) -> Result<()> {
        let secret = self.effective_secret(secret);
        Editor::new(&self.executor, &self.binary).edit(path.as_ref(), secret.as_ref(), vault_id)
    }

    /// Rekey a vault file from its old credential to a new one.
    pub fn rekey(
        &self,
        path: impl AsRef<Path>,
        old_secret: Option<&Secret>,
        new_secret: Option<&Secret>,
        vault_id: Option<&str>,
    ) -> Result<()> {
        let old_secret = self.effective_secret(old_secret);
        Rekeyer::new(&self.executor, &self.binary).rekey(
            path.as_ref(),
            old_secret.as_ref(),
            new_secret,
            vault_id,
        )
    }

    /// A caller-supplied secret wins; otherwise the configured default
    /// password file stands in.
    fn effective_secret(&self, secret: Option<&Secret>) -> Option<Secret> {
        match secret {
            Some(secret) => Some(secret.clone()),
            None => self
                .default_password_file
                .clone()
                .map(Secret::File),
        }
    }
}
