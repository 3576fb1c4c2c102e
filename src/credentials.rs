//! Credential material and the temporary files that carry it.
//!
//! Secrets are never placed on a command line. An in-memory password is
//! written to a private temporary file and the file's path is handed to the
//! external tool; the file is removed again when the operation finishes,
//! whatever the outcome.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Result, VaultError};

/// A secret used to lock or unlock vault content.
#[derive(Debug, Clone)]
pub enum Secret {
    /// An in-memory password. Materialized into a [`CredentialFile`] for the
    /// duration of a single command.
    Password(String),
    /// A caller-managed password file. Passed through as-is, never deleted.
    File(PathBuf),
}

/// A freshly created temporary file whose sole content is one secret.
///
/// The file is written byte-exact (no trailing newline) with owner-only
/// permissions where the platform supports them, and is removed when the
/// value is dropped — on every exit path.
#[derive(Debug)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    /// Write `secret` to a new uniquely named temporary file.
    pub fn new(secret: &str) -> Result<Self> {
        Self::with_bytes(secret.as_bytes())
    }

    pub fn with_bytes(secret: &[u8]) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("vault-pass-")
            .tempfile()
            .map_err(|source| VaultError::Resource {
                context: "failed to create temporary credential file",
                source,
            })?;

        if let Err(source) = file.write_all(secret).and_then(|()| file.flush()) {
            // The partially written file is removed when `file` drops here.
            return Err(VaultError::Resource {
                context: "failed to write temporary credential file",
                source,
            });
        }

        restrict_to_owner(file.path());

        let (_, path) = file.keep().map_err(|e| VaultError::Resource {
            context: "failed to persist temporary credential file",
            source: e.error,
        })?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CredentialFile {
    fn drop(&mut self) {
        delete(&self.path);
    }
}

/// Remove a credential file. Missing files are a no-op; other failures are
/// logged and swallowed — deletion is cleanup, not the primary operation.
pub fn delete(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("failed to remove credential file {}: {e}", path.display()),
    }
}

/// Owner read/write only. Platforms without POSIX permissions skip this.
fn restrict_to_owner(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(path) {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            let _ = fs::set_permissions(path, perms);
        }
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
}

/// A password source resolved for the duration of one command.
///
/// Holding the value keeps a materialized credential file alive; dropping it
/// deletes the file.
#[derive(Debug)]
pub enum CredSource {
    Temp(CredentialFile),
    Path(PathBuf),
}

impl CredSource {
    pub fn path(&self) -> &Path {
        match self {
            CredSource::Temp(file) => file.path(),
            CredSource::Path(path) => path,
        }
    }
}

/// Turn a secret into something addressable by path, materializing a
/// temporary credential file for in-memory passwords.
pub fn materialize(secret: &Secret) -> Result<CredSource> {
    match secret {
        Secret::Password(password) => Ok(CredSource::Temp(CredentialFile::new(password)?)),
        Secret::File(path) => Ok(CredSource::Path(path.clone())),
    }
}

/// Resolve a caller-supplied secret into something addressable by path.
///
/// `missing` is the fail-fast message raised when no secret is available;
/// this happens before any process is spawned.
pub fn resolve_secret(secret: Option<&Secret>, missing: &'static str) -> Result<CredSource> {
    match secret {
        Some(secret) => materialize(secret),
        None => Err(VaultError::InvalidArgument(missing)),
    }
}
