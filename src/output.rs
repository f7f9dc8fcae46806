//! Output file writers
//!
//! Thin wrappers over std::fs plus the two pieces of operational
//! bootstrap: output directory creation and the idempotent HTTP secret.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::RngCore;
use serde::Serialize;
use tracing::debug;

/// Filename of the env file holding the shared registry HTTP secret.
pub const ENV_FILE: &str = ".env";

/// Serialize `data` as YAML into `path`, replacing any existing file.
pub fn write_yaml_file<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = serde_yaml::to_string(data)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write plain text into `path`, replacing any existing file.
pub fn write_text_file(path: &Path, data: &str) -> Result<()> {
    fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}

/// Create the output directory and its `acme/` subdirectory if absent.
///
/// Returns true when the directory had to be created.
pub fn ensure_output_dirs(output_dir: &Path) -> Result<bool> {
    let created = !output_dir.exists();
    fs::create_dir_all(output_dir.join("acme"))
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    Ok(created)
}

/// Write the shared HTTP secret into `<output_dir>/.env`.
///
/// The secret is a 64-hex-character token from 32 random bytes. An
/// existing env file is left untouched so a regeneration run never
/// rotates the secret out from under running registries.
pub fn write_http_secret(output_dir: &Path) -> Result<bool> {
    let env_path = output_dir.join(ENV_FILE);
    if env_path.exists() {
        debug!("{} already exists, keeping existing secret", env_path.display());
        return Ok(false);
    }

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let token: String = bytes.iter().map(|byte| format!("{:02x}", byte)).collect();

    fs::write(&env_path, format!("REGISTRY_HTTP_SECRET={}\n", token))
        .with_context(|| format!("Failed to write {}", env_path.display()))?;
    Ok(true)
}
