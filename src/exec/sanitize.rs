//! Redaction of secret-bearing tokens from command vectors.
//!
//! Sanitization is strictly a presentation-layer transform: it produces the
//! rendering used in error messages and logs, and never touches the vector
//! handed to the process runner.

use shell_escape::escape;
use std::borrow::Cow;

/// Replacement for masked secret material.
pub const MASK: &str = "****";

/// Argument tokens known to precede or embed secret material.
const SENSITIVE_FLAGS: &[&str] = &[
    "--vault-password",
    "--new-vault-password",
    "--vault-password-file",
    "--new-vault-password-file",
    "--password",
    "-p",
];

fn is_sensitive(token: &str) -> bool {
    SENSITIVE_FLAGS.contains(&token)
}

/// Match a short sensitive flag glued to its value (`-psecret`).
fn compacted_short_flag(token: &str) -> Option<&'static str> {
    SENSITIVE_FLAGS
        .iter()
        .copied()
        .filter(|flag| !flag.starts_with("--"))
        .find(|flag| token.len() > flag.len() && token.starts_with(flag))
}

/// Produce a copy of `command` with every secret-bearing token masked.
///
/// Handles the space-separated (`--vault-password s3cr3t`), `=`-joined
/// (`--vault-password=s3cr3t`) and compacted short (`-ps3cr3t`) forms.
/// Non-sensitive tokens pass through unchanged, in order.
pub fn sanitize(command: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(command.len());
    let mut i = 0;

    while i < command.len() {
        let token = &command[i];

        if is_sensitive(token) {
            // A sensitive flag never serves as another flag's value; only a
            // non-flag successor is treated as the secret.
            if let Some(next) = command.get(i + 1) {
                if !is_sensitive(next) {
                    out.push(token.clone());
                    out.push(MASK.to_string());
                    i += 2;
                    continue;
                }
            }
            out.push(token.clone());
            i += 1;
            continue;
        }

        if let Some((flag, _)) = token.split_once('=') {
            if is_sensitive(flag) {
                out.push(format!("{flag}={MASK}"));
                i += 1;
                continue;
            }
        }

        if let Some(flag) = compacted_short_flag(token) {
            out.push(format!("{flag}{MASK}"));
            i += 1;
            continue;
        }

        out.push(token.clone());
        i += 1;
    }

    out
}

/// Render a sanitized, shell-quoted single-line form of `command`.
pub fn render(command: &[String]) -> String {
    sanitize(command)
        .into_iter()
        .map(|token| escape(Cow::Owned(token)).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
