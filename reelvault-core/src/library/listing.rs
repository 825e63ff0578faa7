//! Directory listing and file resolution for the video library.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::sandbox::SandboxRoot;
use super::{LibraryError, LibraryResult};
use crate::config::LibraryConfig;

/// Snapshot of a single directory entry.
///
/// Built from one stat call per request and never cached; the filesystem
/// itself is the source of truth.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Bare file or directory name.
    pub name: String,
    /// Library-relative path, always `/`-prefixed.
    pub path: String,
    /// Whether the entry is a directory.
    pub is_directory: bool,
    /// Size in bytes as reported by the filesystem.
    pub size: u64,
    /// Last modification time.
    pub modified_time: DateTime<Utc>,
}

/// Read and mutate access to the sandboxed library tree.
#[derive(Debug, Clone)]
pub struct VideoLibrary {
    sandbox: SandboxRoot,
    output_dir_name: &'static str,
}

impl VideoLibrary {
    /// Opens the library described by `config`, creating the root if absent.
    ///
    /// # Errors
    ///
    /// - `LibraryError::IoError` - Root cannot be created or canonicalized
    pub fn new(config: &LibraryConfig) -> LibraryResult<Self> {
        let sandbox = SandboxRoot::new(&config.root_dir)?;
        Ok(Self {
            sandbox,
            output_dir_name: config.output_dir_name,
        })
    }

    /// The sandbox guarding this library.
    pub fn sandbox(&self) -> &SandboxRoot {
        &self.sandbox
    }

    /// The canonical library root directory.
    pub fn root(&self) -> &Path {
        self.sandbox.root()
    }

    /// Lists the direct children of a library directory (non-recursive).
    ///
    /// Entries are returned sorted by name. An empty directory yields an
    /// empty list.
    ///
    /// # Errors
    ///
    /// - `LibraryError::AccessDenied` - Path escapes the root
    /// - `LibraryError::NotFound` - Directory does not exist
    /// - `LibraryError::NotADirectory` - Path exists but is not a directory
    /// - `LibraryError::IoError` - Underlying filesystem failure
    pub async fn list_directory(&self, relative: &str) -> LibraryResult<Vec<FileEntry>> {
        let dir = self.sandbox.resolve(relative)?;

        let metadata = tokio::fs::metadata(&dir)
            .await
            .map_err(|source| Self::stat_error(relative, source))?;
        if !metadata.is_dir() {
            return Err(LibraryError::NotADirectory {
                path: relative.to_string(),
            });
        }

        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|source| LibraryError::IoError {
                operation: format!("read directory {relative}"),
                source,
            })?;

        let mut listing = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| LibraryError::IoError {
                operation: format!("read directory {relative}"),
                source,
            })?
        {
            let path = entry.path();
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) => {
                    // One unreadable entry should not break the listing.
                    tracing::warn!("Failed to stat {}: {e}", path.display());
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            let modified_time = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            listing.push(FileEntry {
                path: self.sandbox.relative_path(&path)?,
                name,
                is_directory: metadata.is_dir(),
                size: metadata.len(),
                modified_time,
            });
        }

        listing.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listing)
    }

    /// Resolves a library-relative path to an existing regular file.
    ///
    /// # Errors
    ///
    /// - `LibraryError::AccessDenied` - Path escapes the root
    /// - `LibraryError::NotFound` - File does not exist or is not a regular file
    pub async fn resolve_file(&self, relative: &str) -> LibraryResult<PathBuf> {
        let path = self.sandbox.resolve(relative)?;

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(path),
            Ok(_) => Err(LibraryError::NotFound {
                path: relative.to_string(),
            }),
            Err(source) => Err(Self::stat_error(relative, source)),
        }
    }

    /// Deletes a file, or a directory tree recursively.
    ///
    /// # Errors
    ///
    /// - `LibraryError::AccessDenied` - Path escapes the root
    /// - `LibraryError::NotFound` - Entry does not exist
    /// - `LibraryError::IoError` - Removal failed
    pub async fn delete_entry(&self, relative: &str) -> LibraryResult<()> {
        let path = self.sandbox.resolve(relative)?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|source| Self::stat_error(relative, source))?;

        let result = if metadata.is_dir() {
            tokio::fs::remove_dir_all(&path).await
        } else {
            tokio::fs::remove_file(&path).await
        };

        result.map_err(|source| LibraryError::IoError {
            operation: format!("delete {relative}"),
            source,
        })
    }

    /// Ensures the reserved output subdirectory exists and returns its path.
    ///
    /// # Errors
    ///
    /// - `LibraryError::IoError` - Directory creation failed
    pub async fn ensure_output_dir(&self) -> LibraryResult<PathBuf> {
        let dir = self.root().join(self.output_dir_name);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| LibraryError::IoError {
                operation: format!("create output directory {}", dir.display()),
                source,
            })?;
        Ok(dir)
    }

    fn stat_error(relative: &str, source: std::io::Error) -> LibraryError {
        if source.kind() == std::io::ErrorKind::NotFound {
            LibraryError::NotFound {
                path: relative.to_string(),
            }
        } else {
            LibraryError::IoError {
                operation: format!("stat {relative}"),
                source,
            }
        }
    }
}
