use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use vaultwrap::{Secret, Vault, VaultConfig};

#[derive(Parser)]
#[command(name = "vaultwrap")]
#[command(about = "Drive the ansible-vault CLI with safe credential handling", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the ansible-vault binary (overrides ANSIBLE_VAULT_BIN)
    #[arg(long, global = true)]
    binary: Option<String>,

    /// Vault password file used for every operation
    #[arg(long, global = true)]
    password_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new encrypted vault file
    Create {
        path: PathBuf,

        /// Create the file without encryption
        #[arg(long)]
        plaintext: bool,
    },

    /// Encrypt a file in place
    Encrypt {
        path: PathBuf,

        #[arg(long)]
        vault_id: Option<String>,
    },

    /// Decrypt a file in place
    Decrypt {
        path: PathBuf,

        #[arg(long)]
        vault_id: Option<String>,
    },

    /// Print the decrypted content of a vault file
    View {
        path: PathBuf,

        #[arg(long)]
        vault_id: Option<String>,
    },

    /// Encrypt a string read from stdin into vault text
    EncryptString {
        /// Variable name for the produced YAML snippet
        #[arg(long, default_value = "secret")]
        name: String,

        #[arg(long)]
        vault_id: Option<String>,
    },

    /// Decrypt vault text read from stdin
    DecryptString {
        #[arg(long)]
        vault_id: Option<String>,
    },

    /// Open a vault file in the configured editor
    Edit {
        path: PathBuf,

        #[arg(long)]
        vault_id: Option<String>,
    },

    /// Re-encrypt a vault file under a new password
    Rekey {
        path: PathBuf,

        /// Password file holding the new password
        #[arg(long)]
        new_password_file: Option<PathBuf>,

        #[arg(long)]
        vault_id: Option<String>,
    },

    /// Report whether a file carries the vault header
    IsEncrypted { path: PathBuf },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // is-encrypted is a local check; it works without the external tool.
    if let Commands::IsEncrypted { path } = &cli.command {
        let verdict = if vaultwrap::detect::is_encrypted_file(path) {
            "encrypted"
        } else {
            "plaintext"
        };
        println!("{verdict}");
        return Ok(());
    }

    // The global password file becomes the facade's default credential, so
    // every subcommand below passes `None` for the secret.
    let vault = Vault::new(VaultConfig {
        binary: cli.binary,
        password_file: cli.password_file,
        timeout: None,
    })?;

    match cli.command {
        Commands::Create { path, plaintext } => {
            vault.create(&path, None, !plaintext)?;
            println!("Created {}", path.display());
        }
        Commands::Encrypt { path, vault_id } => {
            let status = vault.encrypt(&path, None, vault_id.as_deref())?;
            println!("{status}");
        }
        Commands::Decrypt { path, vault_id } => {
            let status = vault.decrypt(&path, None, vault_id.as_deref())?;
            println!("{status}");
        }
        Commands::View { path, vault_id } => {
            let content = vault.view(&path, None, vault_id.as_deref())?;
            println!("{content}");
        }
        Commands::EncryptString { name, vault_id } => {
            let plaintext = read_stdin()?;
            let vault_text =
                vault.encrypt_string(&plaintext, None, vault_id.as_deref(), Some(&name))?;
            println!("{vault_text}");
        }
        Commands::DecryptString { vault_id } => {
            let vault_text = read_stdin()?;
            let plaintext = vault.decrypt_string(&vault_text, None, vault_id.as_deref())?;
            println!("{plaintext}");
        }
        Commands::Edit { path, vault_id } => {
            vault.edit(&path, None, vault_id.as_deref())?;
        }
        Commands::Rekey {
            path,
            new_password_file,
            vault_id,
        } => {
            let new_secret = new_password_file.map(Secret::File);
            vault.rekey(&path, None, new_secret.as_ref(), vault_id.as_deref())?;
            println!("Rekeyed {}", path.display());
        }
        Commands::IsEncrypted { .. } => unreachable!("handled before construction"),
    }

    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    Ok(input)
}
