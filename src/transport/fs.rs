use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::DatagenError;

/// Write `items` as JSON Lines, one compact object per line.
///
/// Missing parent directories are created. An existing file is truncated.
/// Returns the path that was written.
pub fn write_jsonl<T: Serialize>(
    items: &[T],
    output_file: impl AsRef<Path>,
) -> Result<PathBuf, DatagenError> {
    let path = output_file.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}
