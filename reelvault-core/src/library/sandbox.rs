//! Canonicalized path containment for the library root.
//!
//! Traversal protection works in two stages: requested paths are first
//! normalized lexically (rejecting any `..` that would climb past the
//! root), then re-checked against the canonicalized filesystem path so
//! symlinks cannot smuggle a resolution outside the sandbox. String
//! prefix comparison alone is not sufficient for either case.

use std::path::{Component, Path, PathBuf};

use super::{LibraryError, LibraryResult};

/// The single directory tree all library operations are confined to.
#[derive(Debug, Clone)]
pub struct SandboxRoot {
    /// Canonicalized root directory.
    root: PathBuf,
}

impl SandboxRoot {
    /// Creates a sandbox anchored at `root`, creating the directory if absent.
    ///
    /// # Errors
    ///
    /// - `LibraryError::IoError` - Root cannot be created or canonicalized
    pub fn new(root: &Path) -> LibraryResult<Self> {
        std::fs::create_dir_all(root).map_err(|source| LibraryError::IoError {
            operation: format!("create library root {}", root.display()),
            source,
        })?;

        let root = root
            .canonicalize()
            .map_err(|source| LibraryError::IoError {
                operation: format!("canonicalize library root {}", root.display()),
                source,
            })?;

        Ok(Self { root })
    }

    /// The canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a library-relative path to an absolute path inside the root.
    ///
    /// Accepts paths with or without a leading `/`. The resolved path is
    /// guaranteed to be a descendant of the root; the target itself does
    /// not have to exist (output paths are resolved before creation), but
    /// its closest existing ancestor must canonicalize to a location
    /// inside the root.
    ///
    /// # Errors
    ///
    /// - `LibraryError::AccessDenied` - Resolution escapes the root
    /// - `LibraryError::IoError` - Canonicalization failed
    pub fn resolve(&self, relative: &str) -> LibraryResult<PathBuf> {
        let trimmed = relative.trim_start_matches('/');

        // Lexical normalization: fold out `.` and `..` without touching
        // the filesystem, refusing any `..` that would climb past the root.
        let mut normalized = PathBuf::new();
        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !normalized.pop() {
                        tracing::warn!("Rejected traversal attempt: {relative}");
                        return Err(LibraryError::AccessDenied);
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(LibraryError::AccessDenied);
                }
            }
        }

        let joined = self.root.join(normalized);

        // Symlink check: canonicalize the closest existing ancestor and
        // require it to still live under the root.
        let mut probe = joined.as_path();
        while !probe.exists() {
            probe = probe.parent().unwrap_or(self.root.as_path());
        }
        let canonical = probe.canonicalize().map_err(|source| LibraryError::IoError {
            operation: format!("canonicalize {}", probe.display()),
            source,
        })?;

        if !canonical.starts_with(&self.root) {
            tracing::warn!("Rejected symlink escape: {relative}");
            return Err(LibraryError::AccessDenied);
        }

        Ok(joined)
    }

    /// Maps an absolute path back to its library-relative form.
    ///
    /// The result always begins with `/` and uses forward slashes, so it
    /// round-trips through [`SandboxRoot::resolve`] and through the same
    /// join logic the browser client uses.
    ///
    /// # Errors
    ///
    /// - `LibraryError::AccessDenied` - Path is not under the root
    pub fn relative_path(&self, absolute: &Path) -> LibraryResult<String> {
        let stripped = absolute
            .strip_prefix(&self.root)
            .map_err(|_| LibraryError::AccessDenied)?;

        let mut relative = String::from("/");
        let parts: Vec<_> = stripped
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();
        relative.push_str(&parts.join("/"));

        Ok(relative)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn sandbox() -> (tempfile::TempDir, SandboxRoot) {
        let dir = tempdir().unwrap();
        let sandbox = SandboxRoot::new(dir.path()).unwrap();
        (dir, sandbox)
    }

    #[test]
    fn test_resolve_plain_path() {
        let (_dir, sandbox) = sandbox();
        let resolved = sandbox.resolve("/movies/clip.mp4").unwrap();
        assert_eq!(resolved, sandbox.root().join("movies/clip.mp4"));
    }

    #[test]
    fn test_resolve_root_itself() {
        let (_dir, sandbox) = sandbox();
        assert_eq!(sandbox.resolve("/").unwrap(), sandbox.root());
        assert_eq!(sandbox.resolve("").unwrap(), sandbox.root());
    }

    #[test]
    fn test_resolve_rejects_parent_traversal() {
        let (_dir, sandbox) = sandbox();
        assert!(matches!(
            sandbox.resolve("../outside"),
            Err(LibraryError::AccessDenied)
        ));
        assert!(matches!(
            sandbox.resolve("/a/../../outside"),
            Err(LibraryError::AccessDenied)
        ));
    }

    #[test]
    fn test_resolve_folds_internal_parent_dirs() {
        let (_dir, sandbox) = sandbox();
        let resolved = sandbox.resolve("/a/b/../c").unwrap();
        assert_eq!(resolved, sandbox.root().join("a/c"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_symlink_escape() {
        let outside = tempdir().unwrap();
        let (_dir, sandbox) = sandbox();

        std::os::unix::fs::symlink(outside.path(), sandbox.root().join("escape")).unwrap();

        assert!(matches!(
            sandbox.resolve("/escape/secret.mp4"),
            Err(LibraryError::AccessDenied)
        ));
    }

    #[test]
    fn test_relative_path_round_trip() {
        let (_dir, sandbox) = sandbox();
        let absolute = sandbox.resolve("/movies/clip.mp4").unwrap();
        let relative = sandbox.relative_path(&absolute).unwrap();
        assert_eq!(relative, "/movies/clip.mp4");
        assert_eq!(sandbox.resolve(&relative).unwrap(), absolute);
    }

    #[test]
    fn test_relative_path_rejects_foreign_path() {
        let (_dir, sandbox) = sandbox();
        assert!(matches!(
            sandbox.relative_path(Path::new("/etc/passwd")),
            Err(LibraryError::AccessDenied)
        ));
    }
}
