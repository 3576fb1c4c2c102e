pub mod credentials;
pub mod detect;
pub mod error;
pub mod exec;
pub mod ops;
pub mod vault;

pub use credentials::{CredentialFile, Secret};
pub use error::{ExecutionFailure, Result, VaultError};
pub use vault::{Vault, VaultConfig};
