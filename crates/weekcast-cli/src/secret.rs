//! Secret reference resolver.
//!
//! Values in `config.toml` can use special prefixes to reference secrets
//! stored outside the file:
//!
//! - `env::VAR_NAME`: reads `$VAR_NAME` (a `.env` file is loaded first)
//! - `pass::path/in/store`: runs `pass show path/in/store`, returns first line
//! - `file::/run/secrets/name`: first line of a file (container secrets)
//! - anything else: returned as-is (plain text)

use std::path::Path;

/// Resolves a value that may contain a secret reference prefix.
///
/// Resolved values are trimmed; an empty result is an error.
pub fn resolve(value: &str) -> Result<String, String> {
    let resolved = if let Some(var) = value.strip_prefix("env::") {
        resolve_env(var)?
    } else if let Some(path) = value.strip_prefix("pass::") {
        resolve_pass(path)?
    } else if let Some(path) = value.strip_prefix("file::") {
        resolve_file(Path::new(path))?
    } else {
        value.to_string()
    };

    let resolved = resolved.trim();
    if resolved.is_empty() {
        return Err(format!("`{}` resolved to an empty value", describe(value)));
    }
    Ok(resolved.to_string())
}

/// Returns true if `value` points elsewhere instead of holding the secret.
pub fn is_reference(value: &str) -> bool {
    ["env::", "pass::", "file::"]
        .iter()
        .any(|prefix| value.starts_with(prefix))
}

/// Returns a form of `value` that is safe to print.
///
/// References are shown as written; inline secrets are masked.
pub fn describe(value: &str) -> String {
    if is_reference(value) || value.is_empty() {
        value.to_string()
    } else {
        "<inline secret>".to_string()
    }
}

/// Reads an environment variable.
fn resolve_env(var: &str) -> Result<String, String> {
    std::env::var(var).map_err(|_| format!("environment variable `{}` is not set", var))
}

/// Runs `pass show <path>` and returns the first line of stdout.
fn resolve_pass(path: &str) -> Result<String, String> {
    let output = std::process::Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| format!("failed to run `pass show {}`: {}", path, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "`pass show {}` failed (exit {}): {}",
            path,
            output.status,
            stderr.trim()
        ));
    }

    first_line(&String::from_utf8_lossy(&output.stdout))
        .ok_or_else(|| format!("`pass show {}` produced no output", path))
}

/// Reads the first line of a file.
fn resolve_file(path: &Path) -> Result<String, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read secret file {}: {}", path.display(), e))?;
    first_line(&content).ok_or_else(|| format!("secret file {} is empty", path.display()))
}

fn first_line(text: &str) -> Option<String> {
    text.lines().next().map(|s| s.to_string())
}
