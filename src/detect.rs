//! Recognition of vault-encrypted content by its textual header.

use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// True when `content` starts with the vault header, ignoring leading
/// whitespace.
pub fn is_encrypted_string(content: &str) -> bool {
    let re = Regex::new(r"^\s*\$ANSIBLE_VAULT;").expect("invalid header pattern");
    re.is_match(content)
}

/// True when the first line of the file at `path` carries the vault header.
///
/// Missing or unreadable files are simply not vaults.
pub fn is_encrypted_file(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut first_line = String::new();
    if BufReader::new(file).read_line(&mut first_line).is_err() {
        return false;
    }
    is_encrypted_string(&first_line)
}
