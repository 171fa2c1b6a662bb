use crate::ledger::LedgerSnapshot;
use crate::tree::ContentNode;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid lesson JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a lesson document stored as a JSON content tree
pub fn read_lesson(path: &Path) -> Result<ContentNode, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Write a lesson document as pretty JSON
pub fn write_lesson(path: &Path, document: &ContentNode) -> Result<(), IoError> {
    write_json(path, &serde_json::to_string_pretty(document)?)
}

/// Write the pending edits in the same shape the host receives
pub fn write_edits(path: &Path, snapshot: &LedgerSnapshot) -> Result<(), IoError> {
    write_json(path, &serde_json::to_string_pretty(snapshot)?)
}

fn write_json(path: &Path, json: &str) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(())
}
