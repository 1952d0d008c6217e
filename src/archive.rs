// src/archive.rs
//! The daily ZIP bundle of generated documents plus the job summary

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::fs_ops::FsOps;

pub fn archive_name(date: NaiveDate) -> String {
    format!("CVs_Generated_{}.zip", date.format("%Y-%m-%d"))
}

pub fn summary_name(date: NaiveDate) -> String {
    format!("Job_Summary_{}.txt", date.format("%Y-%m-%d"))
}

/// Write the job summary next to the artifacts and bundle everything into
/// `CVs_Generated_<date>.zip`. Entries are stored by file name; a name already
/// in the archive, or a file that no longer exists, is skipped.
pub fn create_archive(
    output_dir: &Path,
    date: NaiveDate,
    artifacts: &[PathBuf],
    job_summary: &str,
) -> Result<PathBuf> {
    let summary_path = output_dir.join(summary_name(date));
    std::fs::write(&summary_path, job_summary)
        .with_context(|| format!("Failed to write job summary: {}", summary_path.display()))?;

    let zip_path = output_dir.join(archive_name(date));
    let file = File::create(&zip_path)
        .with_context(|| format!("Failed to create archive: {}", zip_path.display()))?;

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut seen = HashSet::new();

    for path in artifacts.iter().chain(std::iter::once(&summary_path)) {
        let name = FsOps::file_name(path);
        if name.is_empty() || seen.contains(&name) {
            warn!("Skipping duplicate archive entry: {}", path.display());
            continue;
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping {} in archive: {}", path.display(), e);
                continue;
            }
        };

        zip.start_file(name.as_str(), options)
            .with_context(|| format!("Failed to add {} to archive", name))?;
        zip.write_all(&bytes)
            .with_context(|| format!("Failed to write {} into archive", name))?;
        seen.insert(name);
    }

    zip.finish().context("Failed to finalize archive")?;

    info!("ZIP file created: {} ({} entries)", zip_path.display(), seen.len());
    Ok(zip_path)
}
