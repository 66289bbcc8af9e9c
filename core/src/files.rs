//! Filesystem boundary: turning declared paths into [`SourceFiles`].
//!
//! The resolver never touches the filesystem directly. It asks a
//! [`FileResolver`] for the files under a directory (narrowed by a
//! [`FileConstraint`]) or at a path. [`ProjectFiles`] is the on-disk
//! implementation; tests use an in-memory one.

use crate::{FileConstraint, RelativePath, SourceFile, SourceFiles};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Filesystem failure while resolving a path.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// Walking a directory failed (permissions, broken entries, loops).
    #[error("cannot read \"{path}\": {source}")]
    Walk {
        /// Path being walked.
        path: PathBuf,
        /// Underlying walk error.
        #[source]
        source: walkdir::Error,
    },
    /// A path could not be read for a reason other than walking.
    #[error("cannot read \"{path}\": {reason}")]
    Unreadable {
        /// Offending path.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },
    /// A declared path resolves outside the project root.
    #[error("\"{path}\" is outside the project root \"{root}\"")]
    OutsideRoot {
        /// Offending path.
        path: PathBuf,
        /// Project root.
        root: PathBuf,
    },
}

/// Resolves declared paths against a project.
pub trait FileResolver {
    /// The project root.
    fn root(&self) -> &Path;

    /// Resolve a declared (project-relative) path to an absolute one.
    ///
    /// Absolute declarations are returned as given.
    fn absolute_path(&self, declared: &str) -> PathBuf {
        let declared = Path::new(declared.trim());
        if declared.is_absolute() {
            declared.to_path_buf()
        } else {
            self.root().join(declared)
        }
    }

    /// Every file under `dir` whose name matches `constraint`.
    ///
    /// A missing directory yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`FileError`] if the directory cannot be read.
    fn files_under(
        &self,
        dir: &Path,
        constraint: &FileConstraint,
    ) -> Result<SourceFiles, FileError>;

    /// The file at `path` (singleton), every file under it (directory), or
    /// nothing (missing path).
    ///
    /// # Errors
    ///
    /// Returns [`FileError`] if the path exists but cannot be read.
    fn files_at(&self, path: &Path) -> Result<SourceFiles, FileError>;
}

/// [`FileResolver`] over a project directory on disk.
///
/// Traversal is sorted by file name, so the same tree always resolves to the
/// same order.
#[derive(Debug, Clone)]
pub struct ProjectFiles {
    root: PathBuf,
}

impl ProjectFiles {
    /// Resolver rooted at `root`.
    ///
    /// A relative root is made absolute against the current directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self {
            root: normalize(&root),
        }
    }

    /// The project-relative form of an absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::OutsideRoot`] if `path` is not below the root.
    pub fn relative(&self, path: &Path) -> Result<RelativePath, FileError> {
        let path = normalize(path);
        path.strip_prefix(&self.root)
            .map(|rel| RelativePath::new(rel.to_string_lossy()))
            .map_err(|_| FileError::OutsideRoot {
                path: path.clone(),
                root: self.root.clone(),
            })
    }

    fn walk(&self, dir: &Path, constraint: &FileConstraint) -> Result<SourceFiles, FileError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|source| FileError::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !constraint.matches(&name) {
                trace!(file = %entry.path().display(), %constraint, "constraint rejected file");
                continue;
            }
            files.push(SourceFile::new(self.relative(entry.path())?));
        }
        Ok(files.into_iter().collect())
    }
}

impl FileResolver for ProjectFiles {
    fn root(&self) -> &Path {
        &self.root
    }

    fn files_under(
        &self,
        dir: &Path,
        constraint: &FileConstraint,
    ) -> Result<SourceFiles, FileError> {
        let dir = normalize(dir);
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "directory does not exist, contributing no files");
            return Ok(SourceFiles::new());
        }
        self.walk(&dir, constraint)
    }

    fn files_at(&self, path: &Path) -> Result<SourceFiles, FileError> {
        let path = normalize(path);
        if path.is_file() {
            return Ok(std::iter::once(SourceFile::new(self.relative(&path)?)).collect());
        }
        if path.is_dir() {
            return self.walk(&path, &FileConstraint::None);
        }
        debug!(path = %path.display(), "path does not exist, contributing no files");
        Ok(SourceFiles::new())
    }
}

/// Lexically remove `.` and resolve `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
