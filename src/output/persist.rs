//! File persistence shared by all output formats

use crate::output::traits::{OutputError, OutputResult};
use std::fs::Permissions;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically replaces `path` with `content`
///
/// The content goes to a temporary file in the target directory, which is
/// then renamed over the target. A failure leaves any previous file intact.
/// The replacement keeps the permissions of the file it replaces; a new file
/// is readable by everyone (`0644` on Unix).
pub fn write_atomic(path: &Path, content: &str) -> OutputResult<()> {
    let write_error = |source: std::io::Error| OutputError::Write {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(content.as_bytes()).map_err(write_error)?;
    tmp.flush().map_err(write_error)?;

    // Temp files are created owner-only
    if let Some(permissions) = target_permissions(path) {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(write_error)?;
    }
    tmp.as_file_mut().sync_all().map_err(write_error)?;

    tmp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

fn target_permissions(path: &Path) -> Option<Permissions> {
    match std::fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => new_file_permissions(),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}
