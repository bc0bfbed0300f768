//! JSON file output

use crate::error::{Result, ResultExt};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append `.<ext>` to a path, keeping any dots already in the file name
pub(crate) fn with_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Create the parent directory of `file` if needed
pub(crate) fn ensure_parent(file: &Path) -> Result<()> {
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Write `value` as pretty JSON to `<path>.json`, returning the file written
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf> {
    let file = with_extension(path, "json");
    write_json_file(&file, value)?;
    Ok(file)
}

/// Write `value` as pretty JSON to exactly `file`
pub fn write_json_file<T: Serialize + ?Sized>(file: &Path, value: &T) -> Result<()> {
    ensure_parent(file)?;
    let handle = File::create(file)
        .with_context(|| format!("Failed to create {}", file.display()))?;
    let mut writer = BufWriter::new(handle);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
