// src/fs_ops.rs
//! Filesystem helpers shared by the generators, the archive and the status command

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Write a file, creating its parent directory first
    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        debug!("Written file: {}", path.display());
        Ok(())
    }

    /// Read a file if present, `None` when it does not exist
    pub async fn read_optional(path: &Path) -> Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::read_file_safe(path).await.map(Some)
    }

    /// Make a company or title usable inside a file name.
    /// Alphanumerics, `-` and `_` are kept; runs of anything else become a single `_`.
    pub fn sanitize_component(name: &str) -> String {
        let mapped: String = name
            .trim()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let collapsed = mapped
            .split('_')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        if collapsed.is_empty() {
            "Unknown".to_string()
        } else {
            collapsed
        }
    }

    pub fn file_name(path: &Path) -> String {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string()
    }

    /// Files directly inside `dir`, sorted by name. A missing directory yields an empty list.
    pub async fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if !dir.exists() {
            return Ok(files);
        }

        let mut entries = fs::read_dir(dir)
            .await
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Snapshot of one day's output directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputStatus {
    pub dir: PathBuf,
    pub exists: bool,
    pub cvs: usize,
    pub cover_letters: usize,
    pub archives: usize,
    pub latest_archive: Option<String>,
}

impl OutputStatus {
    pub async fn scan(dir: &Path) -> Result<Self> {
        let mut status = Self {
            dir: dir.to_path_buf(),
            exists: dir.is_dir(),
            ..Default::default()
        };

        let mut latest: Option<(std::time::SystemTime, String)> = None;
        for path in FsOps::list_files(dir).await? {
            let name = FsOps::file_name(&path);
            if name.starts_with("CV_") {
                status.cvs += 1;
            } else if name.starts_with("Cover_Letter_") {
                status.cover_letters += 1;
            } else if name.ends_with(".zip") {
                status.archives += 1;
                let modified = fs::metadata(&path)
                    .await
                    .and_then(|m| m.modified())
                    .with_context(|| format!("Failed to stat {}", path.display()))?;
                if latest.as_ref().map_or(true, |(t, _)| modified >= *t) {
                    latest = Some((modified, name));
                }
            }
        }

        status.latest_archive = latest.map(|(_, name)| name);
        Ok(status)
    }
}
