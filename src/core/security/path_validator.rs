use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::Config;

/// Errors that can occur during path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlinks are not allowed: '{path}'")]
    SymlinkNotAllowed { path: PathBuf },

    #[error("Cannot canonicalize path '{path}': {error}")]
    CannotCanonicalize { path: PathBuf, error: io::Error },

    #[error("file not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Parent directory does not exist: '{path}'")]
    ParentNotFound { path: PathBuf },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: PathBuf, reason: &'static str },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

/// What the caller intends to do with the validated path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAccess {
    /// The path must already exist.
    Read,
    /// The path may not exist yet, but its parent directory must.
    Write,
}

/// Validates a file-tool path against the configured security boundaries.
///
/// Existing paths are canonicalized (resolving `.`, `..` and symlinks). For
/// [`PathAccess::Write`] a missing target is resolved through its parent
/// directory, so creating a new file is checked the same way as
/// overwriting one. When `security.root_path` is set the resolved path must
/// lie inside it; when `security.allow_symlinks` is false a symlink target
/// is rejected outright.
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// let safe_path = validate_path("notes/todo.txt", &config, PathAccess::Write)?;
/// ```
pub fn validate_path(
    input_path: &str,
    config: &Config,
    access: PathAccess,
) -> Result<PathBuf, PathSecurityError> {
    if input_path.trim().is_empty() {
        return Err(PathSecurityError::InvalidPath {
            path: PathBuf::from(input_path),
            reason: "path is empty",
        });
    }

    let path = Path::new(input_path);

    let resolved = match path.symlink_metadata() {
        Ok(metadata) => {
            if metadata.file_type().is_symlink() && !config.security.allow_symlinks {
                return Err(PathSecurityError::SymlinkNotAllowed {
                    path: path.to_path_buf(),
                });
            }
            canonicalize_path(path)?
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => match access {
            PathAccess::Read => {
                return Err(PathSecurityError::PathNotFound {
                    path: path.to_path_buf(),
                });
            }
            PathAccess::Write => resolve_new_file(path)?,
        },
        Err(e) => {
            return Err(PathSecurityError::IoError {
                path: path.to_path_buf(),
                error: e,
            });
        }
    };

    let Some(ref root) = config.security.root_path else {
        return Ok(resolved);
    };

    let canonical_root = root.canonicalize().map_err(|e| PathSecurityError::IoError {
        path: root.clone(),
        error: e,
    })?;

    if !is_within_root(&resolved, &canonical_root) {
        return Err(PathSecurityError::OutsideRootDirectory {
            path: resolved,
            root: canonical_root,
        });
    }

    Ok(resolved)
}

/// Resolve a not-yet-existing file through its (existing) parent directory.
fn resolve_new_file(path: &Path) -> Result<PathBuf, PathSecurityError> {
    let file_name = path.file_name().ok_or_else(|| PathSecurityError::InvalidPath {
        path: path.to_path_buf(),
        reason: "path has no file name",
    })?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if !parent.is_dir() {
        return Err(PathSecurityError::ParentNotFound {
            path: parent.to_path_buf(),
        });
    }

    Ok(canonicalize_path(parent)?.join(file_name))
}

/// Checks if a path is within (or equal to) a root directory
fn is_within_root(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

fn canonicalize_path(path: &Path) -> Result<PathBuf, PathSecurityError> {
    path.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathSecurityError::PathNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PathSecurityError::CannotCanonicalize {
                path: path.to_path_buf(),
                error: e,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_config(root: Option<PathBuf>, allow_symlinks: bool) -> Config {
        use crate::core::config::SecurityConfig;

        let mut config = Config::default();
        config.security = SecurityConfig {
            root_path: root,
            allow_symlinks,
        };
        config
    }

    #[test]
    fn test_no_root_allows_existing_paths() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("test.txt");
        fs::write(&test_file, "test").unwrap();

        let config = create_test_config(None, true);
        let result = validate_path(test_file.to_str().unwrap(), &config, PathAccess::Read);

        assert!(result.is_ok());
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.txt");

        let config = create_test_config(None, true);
        let result = validate_path(missing.to_str().unwrap(), &config, PathAccess::Read);

        assert!(matches!(result, Err(PathSecurityError::PathNotFound { .. })));
    }

    #[test]
    fn test_write_new_file_resolves_through_parent() {
        let temp_dir = TempDir::new().unwrap();
        let new_file = temp_dir.path().join("new.txt");

        let config = create_test_config(Some(temp_dir.path().to_path_buf()), true);
        let resolved =
            validate_path(new_file.to_str().unwrap(), &config, PathAccess::Write).unwrap();

        assert_eq!(
            resolved,
            temp_dir.path().canonicalize().unwrap().join("new.txt")
        );
    }

    #[test]
    fn test_write_missing_parent() {
        let temp_dir = TempDir::new().unwrap();
        let orphan = temp_dir.path().join("no_such_dir").join("file.txt");

        let config = create_test_config(None, true);
        let result = validate_path(orphan.to_str().unwrap(), &config, PathAccess::Write);

        assert!(matches!(result, Err(PathSecurityError::ParentNotFound { .. })));
    }

    #[test]
    fn test_empty_path_rejected() {
        let config = create_test_config(None, true);
        let result = validate_path("  ", &config, PathAccess::Write);
        assert!(matches!(result, Err(PathSecurityError::InvalidPath { .. })));
    }

    #[test]
    fn test_path_outside_root() {
        let root_dir = TempDir::new().unwrap();
        let outside_dir = TempDir::new().unwrap();
        let outside_file = outside_dir.path().join("outside.txt");
        fs::write(&outside_file, "test").unwrap();

        let config = create_test_config(Some(root_dir.path().to_path_buf()), true);
        let result = validate_path(outside_file.to_str().unwrap(), &config, PathAccess::Read);

        assert!(matches!(
            result,
            Err(PathSecurityError::OutsideRootDirectory { .. })
        ));
    }

    #[test]
    fn test_write_traversal_blocked() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        // New file one level above the root via ../
        let config = create_test_config(Some(subdir.clone()), true);
        let traversal_path = subdir.join("../escaped.txt");

        let result = validate_path(traversal_path.to_str().unwrap(), &config, PathAccess::Write);

        assert!(matches!(
            result,
            Err(PathSecurityError::OutsideRootDirectory { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escaping_root_blocked() {
        use std::os::unix::fs::symlink;

        let root_dir = TempDir::new().unwrap();
        let outside_dir = TempDir::new().unwrap();

        let target_file = outside_dir.path().join("target.txt");
        let link_file = root_dir.path().join("link.txt");

        fs::write(&target_file, "test").unwrap();
        symlink(&target_file, &link_file).unwrap();

        let config = create_test_config(Some(root_dir.path().to_path_buf()), true);
        let result = validate_path(link_file.to_str().unwrap(), &config, PathAccess::Read);

        assert!(matches!(
            result,
            Err(PathSecurityError::OutsideRootDirectory { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_disallowed_by_config() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let target_file = temp_dir.path().join("target.txt");
        let link_file = temp_dir.path().join("link.txt");

        fs::write(&target_file, "test").unwrap();
        symlink(&target_file, &link_file).unwrap();

        let config = create_test_config(Some(temp_dir.path().to_path_buf()), false);
        let result = validate_path(link_file.to_str().unwrap(), &config, PathAccess::Read);

        assert!(matches!(
            result,
            Err(PathSecurityError::SymlinkNotAllowed { .. })
        ));
    }
}
