//! Replace-on-write helper shared by the settings and metadata writers.

use crate::ConfigResult;
use camino::Utf8Path;
use grove_core::error::GroveError;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::debug;

/// Write `contents` to a temporary file next to `path` and persist it over `path`
pub(crate) fn write_atomic(path: &Utf8Path, contents: &str) -> ConfigResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };

    fs::create_dir_all(dir)
        .map_err(|e| GroveError::io(format!("Failed to create directory {}", dir), e))?;

    let mut temp_file = NamedTempFile::new_in(dir)
        .map_err(|e| GroveError::io(format!("Failed to create temporary file in {}", dir), e))?;

    debug!("Atomically writing {} bytes to {}", contents.len(), path);

    fill(&mut temp_file, contents)
        .map_err(|e| GroveError::io(format!("Failed to write temporary file for {}", path), e))?;

    // The temporary file is removed on drop if persisting fails
    temp_file
        .persist(path)
        .map_err(|e| GroveError::io(format!("Failed to replace {}", path), e.error))?;

    Ok(())
}

fn fill(temp_file: &mut NamedTempFile, contents: &str) -> std::io::Result<()> {
    temp_file.write_all(contents.as_bytes())?;
    temp_file.flush()?;
    temp_file.as_file().sync_all()
}
