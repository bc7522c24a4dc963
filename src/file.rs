// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::config::consts::CLEANED_FILE;
use crate::core::sanitize::sanitize_file_stem;
use crate::csv::{write_row, SEP};
use crate::error::Result;
use crate::model::Source;

/// `<out>/<site>_reviews_<hotel>.csv`
pub fn raw_path(out_dir: &Path, source: Source, hotel: &str) -> PathBuf {
    out_dir.join(format!("{}_reviews_{}.csv", source.slug(), sanitize_file_stem(hotel)))
}

/// `<out>/cleaned_reviews.csv`
pub fn cleaned_path(out_dir: &Path) -> PathBuf {
    out_dir.join(CLEANED_FILE)
}

/// Write a whole table in one go. The file appears under its final name only
/// once every row is on disk.
pub fn write_table(
    path: &Path,
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let tmp = path.with_extension("csv.part");
    {
        let mut w = BufWriter::new(File::create(&tmp)?);
        if let Some(h) = headers {
            write_row(&mut w, h, SEP)?;
        }
        for r in rows {
            write_row(&mut w, r, SEP)?;
        }
        w.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(path.to_path_buf())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        )
        .into());
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}
