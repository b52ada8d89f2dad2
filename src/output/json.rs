//! JSON report writer

use crate::crawler::RepoRecord;
use crate::ScoutError;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::Path;

/// Serializes records as a pretty-printed JSON list with 4-space indentation
pub fn render_report(records: &[RepoRecord]) -> Result<Vec<u8>, ScoutError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    records.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Writes the report to `path`
///
/// The parent directory is created if needed. The file is written next to
/// its destination and renamed into place, so a reader never sees a
/// half-written report.
///
/// # Arguments
///
/// * `records` - The records to write
/// * `path` - Destination file
pub fn write_report(records: &[RepoRecord], path: &Path) -> Result<(), ScoutError> {
    let content = render_report(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    if let Err(e) = fs::write(&staging, content).and_then(|_| fs::rename(&staging, path)) {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }

    tracing::info!("Output saved to '{}'", path.display());
    Ok(())
}
