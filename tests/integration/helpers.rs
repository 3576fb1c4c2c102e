//! Shared test helpers: stub vault binaries in a temp directory.

use std::fs;
use std::path::{Path, PathBuf};

/// A stub that records every invocation next to itself and answers like the
/// real tool: `--version` succeeds, `encrypt_string` emits vault text,
/// `decrypt --stdin` echoes its stdin with a `plain:` prefix.
const RECORDING_STUB: &str = r#"#!/bin/sh
dir="$(dirname "$0")"
if [ "$1" = "--version" ]; then
  echo probe >> "$dir/version-probes"
  echo "ansible-vault 2.18.1"
  exit 0
fi
printf '%s\n' "$@" > "$dir/last-args"
cat > "$dir/last-stdin"
prev=""
for arg in "$@"; do
  case "$prev" in
    --vault-password-file) cp "$arg" "$dir/last-password" ;;
    --new-vault-password-file) cp "$arg" "$dir/last-new-password" ;;
  esac
  prev="$arg"
done
case "$1" in
  encrypt_string) printf '$ANSIBLE_VAULT;1.1;AES256\n62616e616e61\n' ;;
  decrypt)
    if [ "$2" = "--stdin" ]; then
      sed 's/^/plain:/' "$dir/last-stdin"
    else
      echo "Decryption successful"
    fi
    ;;
  *) echo "Encryption successful" ;;
esac
"#;

/// Write an executable stub named `ansible-vault` into `dir`.
pub fn write_stub(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("ansible-vault");
    fs::write(&path, contents).expect("Failed to write stub binary");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&path).expect("Failed to stat stub").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("Failed to chmod stub");
    }

    path
}

/// The standard recording stub.
pub fn recording_stub(dir: &Path) -> PathBuf {
    write_stub(dir, RECORDING_STUB)
}

/// A stub whose every operation fails with `exit_code` after printing
/// `stderr_line`; the `--version` probe still succeeds.
pub fn failing_stub(dir: &Path, exit_code: i32, stderr_line: &str) -> PathBuf {
    write_stub(
        dir,
        &format!(
            "#!/bin/sh\n\
             if [ \"$1\" = \"--version\" ]; then exit 0; fi\n\
             echo \"{stderr_line}\" >&2\n\
             exit {exit_code}\n"
        ),
    )
}

/// A stub that hangs on every operation; the `--version` probe still
/// succeeds.
pub fn hanging_stub(dir: &Path) -> PathBuf {
    write_stub(
        dir,
        "#!/bin/sh\n\
         if [ \"$1\" = \"--version\" ]; then exit 0; fi\n\
         sleep 5\n",
    )
}

/// Arguments of the stub's most recent non-probe invocation, one per entry.
pub fn last_args(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("last-args"))
        .expect("stub was never invoked")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Stdin payload of the stub's most recent non-probe invocation.
pub fn last_stdin(dir: &Path) -> String {
    fs::read_to_string(dir.join("last-stdin")).expect("stub was never invoked")
}

/// Content of the password file the stub was most recently handed.
pub fn last_password(dir: &Path) -> String {
    fs::read_to_string(dir.join("last-password")).expect("stub saw no password file")
}

/// Content of the new-password file the stub was most recently handed.
pub fn last_new_password(dir: &Path) -> String {
    fs::read_to_string(dir.join("last-new-password")).expect("stub saw no new-password file")
}

/// True when the stub was never invoked with a real operation.
pub fn never_invoked(dir: &Path) -> bool {
    !dir.join("last-args").exists()
}
