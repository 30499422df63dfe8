// src/archive.rs

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::errors::AppError;

/// Packs every file under `dir` into an in-memory ZIP, paths relative to `dir`.
pub async fn zip_directory(dir: &Path) -> Result<Vec<u8>, AppError> {
    let dir = dir.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<Vec<u8>, AppError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        add_dir(&mut writer, &dir, &dir)?;
        Ok(writer.finish()?.into_inner())
    })
    .await?
}

fn add_dir(
    writer: &mut ZipWriter<Cursor<Vec<u8>>>,
    root: &Path,
    dir: &Path,
) -> Result<(), AppError> {
    let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            add_dir(writer, root, &path)?;
            continue;
        }
        let relative = path
            .strip_prefix(root)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        writer.start_file(name, SimpleFileOptions::default())?;
        writer.write_all(&fs::read(&path)?)?;
    }
    Ok(())
}
