//! `SourceFiles` — ordered, deduplicated file sets
//!
//! Suite resolution is a fold over these sets: scan directories, remove
//! exclusions, add inclusions. Every operation returns a new set, so the
//! union and difference laws hold regardless of where in the fold they run.
//!
//! # INV: one entry per path
//!
//! A set never holds two files with the same [`RelativePath`]. The first
//! occurrence wins and keeps its position.

use indexmap::IndexSet;
use serde::{Serialize, Serializer};
use std::fmt;

/// A path relative to the project root, always `/`-separated.
///
/// Leading `./` segments and duplicate separators are normalised away so that
/// `./tests//Unit` and `tests/Unit` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// Normalise and wrap a relative path.
    pub fn new(path: impl AsRef<str>) -> Self {
        let normalized = path
            .as_ref()
            .replace('\\', "/")
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect::<Vec<_>>()
            .join("/");
        Self(normalized)
    }

    /// The path as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path component.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns `true` if `self` is `dir` or lies below it.
    #[must_use]
    pub fn starts_with(&self, dir: &RelativePath) -> bool {
        dir.0.is_empty()
            || self.0 == dir.0
            || (self.0.starts_with(dir.0.as_str()) && self.0[dir.0.len()..].starts_with('/'))
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A resolved file. Identity is its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SourceFile {
    /// Path relative to the project root.
    pub path: RelativePath,
}

impl SourceFile {
    /// Create a source file from a relative path.
    pub fn new(path: impl Into<RelativePath>) -> Self {
        Self { path: path.into() }
    }

    /// The file name (last path component).
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.file_name()
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path.fmt(f)
    }
}

/// Ordered set of [`SourceFile`]s, deduplicated by path.
///
/// ```
/// use suitex::SourceFiles;
///
/// let a = SourceFiles::from_paths(["a.php", "b.php"]);
/// let b = SourceFiles::from_paths(["b.php", "c.php"]);
///
/// assert_eq!(a.add(&b).paths().collect::<Vec<_>>(), ["a.php", "b.php", "c.php"]);
/// assert_eq!(a.remove(&b).paths().collect::<Vec<_>>(), ["a.php"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceFiles {
    files: IndexSet<SourceFile>,
}

// Order is part of the value; `IndexSet`'s own equality ignores it.
impl PartialEq for SourceFiles {
    fn eq(&self, other: &Self) -> bool {
        self.files.iter().eq(other.files.iter())
    }
}

impl Eq for SourceFiles {}

impl SourceFiles {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from relative paths, keeping the first occurrence of each.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        paths
            .into_iter()
            .map(|p| SourceFile::new(RelativePath::new(p)))
            .collect()
    }

    /// Concatenate several sets in order, dropping later duplicates.
    pub fn concat<'a>(sets: impl IntoIterator<Item = &'a SourceFiles>) -> Self {
        Self::new().union(sets)
    }

    /// `self` followed by every set in `others`, in argument order.
    ///
    /// Files already present keep their first position.
    #[must_use]
    pub fn union<'a>(&self, others: impl IntoIterator<Item = &'a SourceFiles>) -> Self {
        let mut files = self.files.clone();
        for other in others {
            files.extend(other.files.iter().cloned());
        }
        Self { files }
    }

    /// Equivalent to `self.union([other])`.
    #[must_use]
    pub fn add(&self, other: &SourceFiles) -> Self {
        self.union([other])
    }

    /// Every file of `self` whose path is not in `exclude`, order preserved.
    #[must_use]
    pub fn remove(&self, exclude: &SourceFiles) -> Self {
        if exclude.is_empty() {
            return self.clone();
        }
        self.files
            .iter()
            .filter(|f| !exclude.files.contains(*f))
            .cloned()
            .collect()
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the set holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns `true` if a file with this path is in the set.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains(&SourceFile::new(RelativePath::new(path)))
    }

    /// Iterate over the files in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &SourceFile> + '_ {
        self.files.iter()
    }

    /// Iterate over the paths in order.
    pub fn paths(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.files.iter().map(|f| f.path.as_str())
    }

    /// The file at `index`, in insertion order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SourceFile> {
        self.files.get_index(index)
    }
}

impl FromIterator<SourceFile> for SourceFiles {
    fn from_iter<T: IntoIterator<Item = SourceFile>>(iter: T) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for SourceFiles {
    type Item = SourceFile;
    type IntoIter = indexmap::set::IntoIter<SourceFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a> IntoIterator for &'a SourceFiles {
    type Item = &'a SourceFile;
    type IntoIter = indexmap::set::Iter<'a, SourceFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

impl Serialize for SourceFiles {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.paths())
    }
}
