//! SHA-256 of a file as formatted by prettier.

use super::ToolError;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Runs `command` with `file_path` appended and hashes its standard output,
/// i.e. the equivalent of `npx -y prettier@3.4.2 README.md | sha256sum`.
pub async fn calculate_sha256(command: &[String], file_path: &Path) -> Result<Value, ToolError> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| ToolError::CommandFailed("formatter command is empty".to_string()))?;

    tracing::debug!(
        program = %program,
        file = %file_path.display(),
        "Running formatter"
    );

    let output = Command::new(program)
        .args(args)
        .arg(file_path)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| ToolError::CommandFailed(format!("failed to start {}: {}", program, e)))?;

    if !output.status.success() {
        return Err(ToolError::CommandFailed(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(json!({ "hash": sha256_hex(&output.stdout) }))
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
