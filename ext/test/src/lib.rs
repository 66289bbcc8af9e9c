//! suitex-test: in-memory collaborators for testing suite resolution
//!
//! Provides a [`FakeProject`] file tree and a [`FakeIntrospector`] class map so
//! resolvers and filters can be exercised without touching the disk or parsing
//! PHP.
//!
//! # Example
//!
//! ```
//! use suitex_test::prelude::*;
//!
//! let project = FakeProject::new()
//!     .with_file("tests/All/AllMatchingTest.php")
//!     .with_file("tests/All/Random.php");
//!
//! let found = project
//!     .files_under(&project.absolute_path("tests"), &FileConstraint::Suffix("Test.php".into()))
//!     .unwrap();
//! assert_eq!(found.paths().collect::<Vec<_>>(), ["tests/All/AllMatchingTest.php"]);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use suitex::prelude::*;
use suitex::{FileError, IntrospectError, RelativePath};

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Root every [`FakeProject`] path lives under.
pub const FAKE_ROOT: &str = "/fake";

/// In-memory project tree.
///
/// Files are kept in the order a sorted directory walk would visit them, so a
/// `FakeProject` and a [`ProjectFiles`] over the same tree agree.
#[derive(Debug, Clone)]
pub struct FakeProject {
    root: PathBuf,
    files: Vec<RelativePath>,
    unreadable: Vec<RelativePath>,
}

impl Default for FakeProject {
    fn default() -> Self {
        Self {
            root: PathBuf::from(FAKE_ROOT),
            files: Vec::new(),
            unreadable: Vec::new(),
        }
    }
}

impl FakeProject {
    /// An empty project.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A project holding `paths`.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        paths.into_iter().fold(Self::new(), |p, path| p.with_file(path))
    }

    /// Add a file (builder pattern).
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<str>) -> Self {
        let path = RelativePath::new(path);
        if !self.files.contains(&path) {
            self.files.push(path);
            self.files
                .sort_by(|a, b| a.as_str().split('/').cmp(b.as_str().split('/')));
        }
        self
    }

    /// Make reads of `path` (and anything below it) fail (builder pattern).
    #[must_use]
    pub fn unreadable(mut self, path: impl AsRef<str>) -> Self {
        self.unreadable.push(RelativePath::new(path));
        self
    }

    /// Number of files in the project.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the project holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn relative(&self, path: &Path) -> Result<RelativePath, FileError> {
        path.strip_prefix(&self.root)
            .map(|rel| RelativePath::new(rel.to_string_lossy()))
            .map_err(|_| FileError::OutsideRoot {
                path: path.to_path_buf(),
                root: self.root.clone(),
            })
    }

    fn check_readable(&self, path: &Path, rel: &RelativePath) -> Result<(), FileError> {
        if self.unreadable.iter().any(|u| rel.starts_with(u)) {
            return Err(FileError::Unreadable {
                path: path.to_path_buf(),
                reason: "permission denied".into(),
            });
        }
        Ok(())
    }

    fn below<'a>(&'a self, dir: &'a RelativePath) -> impl Iterator<Item = &'a RelativePath> + 'a {
        self.files.iter().filter(move |f| f.starts_with(dir))
    }
}

impl FileResolver for FakeProject {
    fn root(&self) -> &Path {
        &self.root
    }

    fn files_under(
        &self,
        dir: &Path,
        constraint: &FileConstraint,
    ) -> Result<SourceFiles, FileError> {
        let rel = self.relative(dir)?;
        self.check_readable(dir, &rel)?;
        Ok(self
            .below(&rel)
            .filter(|f| f != &&rel && constraint.matches(f.file_name()))
            .cloned()
            .map(SourceFile::new)
            .collect())
    }

    fn files_at(&self, path: &Path) -> Result<SourceFiles, FileError> {
        let rel = self.relative(path)?;
        self.check_readable(path, &rel)?;
        Ok(self.below(&rel).cloned().map(SourceFile::new).collect())
    }
}

/// In-memory [`ClassIntrospector`]: a map from file path to the classes it
/// declares.
///
/// Files without an entry declare no classes.
#[derive(Debug, Clone, Default)]
pub struct FakeIntrospector {
    classes: HashMap<RelativePath, Vec<ClassDescription>>,
    malformed: Vec<RelativePath>,
}

impl FakeIntrospector {
    /// An introspector that knows no classes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `class` in `file` (builder pattern). Classes of one file keep
    /// the order they were added in.
    #[must_use]
    pub fn with_class(mut self, file: impl AsRef<str>, class: ClassDescription) -> Self {
        let file = RelativePath::new(file);
        let class = class.in_file(file.clone());
        self.classes.entry(file).or_default().push(class);
        self
    }

    /// Make describing `file` fail (builder pattern).
    #[must_use]
    pub fn malformed(mut self, file: impl AsRef<str>) -> Self {
        self.malformed.push(RelativePath::new(file));
        self
    }
}

impl ClassIntrospector for FakeIntrospector {
    fn describe(&self, file: &SourceFile) -> Result<Vec<ClassDescription>, IntrospectError> {
        if self.malformed.contains(&file.path) {
            return Err(IntrospectError::Malformed {
                path: file.path.clone(),
                reason: "syntax error".into(),
            });
        }
        Ok(self.classes.get(&file.path).cloned().unwrap_or_default())
    }
}

/// The project used throughout the test suite: one suite, `fake`, mixing
/// directory scans, an exclusion, an inclusion and version gates around 8.0.
#[must_use]
pub fn fake_project() -> FakeProject {
    FakeProject::from_paths([
        "tests/All/AllMatchingTest.php",
        "tests/All/Random.php",
        "tests/All/Exclude/ExcludeTest.php",
        "tests/Alone/AloneTest.php",
        "tests/Alone/AloneMorePhp800gtTest.php",
        "tests/Alone/AloneLessPhp800ltTest.php",
        "tests/MorePhp800gt/MatchingTest.php",
        "tests/MorePhp800gt/NotMatching.php",
        "tests/LessPhp800lt/MatchingTest.php",
        "tests/LessPhp800lt/NotMatching.php",
        "tests/Random/NotATest.php",
    ])
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{fake_project, FakeIntrospector, FakeProject, FAKE_ROOT};
    pub use suitex::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(files: &SourceFiles) -> Vec<&str> {
        files.paths().collect()
    }

    #[test]
    fn files_are_kept_in_walk_order() {
        let project = FakeProject::from_paths(["a.php", "a/b.php", "B.php", "a/A.php"]);
        let all = project
            .files_at(&project.absolute_path(""))
            .unwrap();
        assert_eq!(paths(&all), ["B.php", "a/A.php", "a/b.php", "a.php"]);
    }

    #[test]
    fn files_under_applies_constraint() {
        let project = fake_project();
        let found = project
            .files_under(
                &project.absolute_path("tests/MorePhp800gt"),
                &FileConstraint::Suffix("Test.php".into()),
            )
            .unwrap();
        assert_eq!(paths(&found), ["tests/MorePhp800gt/MatchingTest.php"]);
    }

    #[test]
    fn files_at_file_directory_and_missing() {
        let project = fake_project();
        let file = project.absolute_path("tests/Random/NotATest.php");
        assert_eq!(paths(&project.files_at(&file).unwrap()), ["tests/Random/NotATest.php"]);

        let dir = project.absolute_path("tests/All");
        assert_eq!(project.files_at(&dir).unwrap().len(), 3);

        let missing = project.absolute_path("tests/Nope");
        assert!(project.files_at(&missing).unwrap().is_empty());
    }

    #[test]
    fn sibling_prefix_is_not_a_child() {
        let project = FakeProject::from_paths(["tests/All/A.php", "tests/AllOther/B.php"]);
        let found = project.files_at(&project.absolute_path("tests/All")).unwrap();
        assert_eq!(paths(&found), ["tests/All/A.php"]);
    }

    #[test]
    fn unreadable_paths_fail() {
        let project = fake_project().unreadable("tests/All");
        let err = project
            .files_under(&project.absolute_path("tests/All"), &FileConstraint::None)
            .unwrap_err();
        assert!(matches!(err, FileError::Unreadable { .. }));
    }

    #[test]
    fn paths_outside_root_fail() {
        let project = fake_project();
        assert!(matches!(
            project.files_at(Path::new("/elsewhere/a.php")),
            Err(FileError::OutsideRoot { .. })
        ));
    }

    #[test]
    fn introspector_describes_known_files() {
        let introspector = FakeIntrospector::new()
            .with_class("tests/ATest.php", ClassDescription::new("ATest").with_capability("Test"))
            .with_class("tests/ATest.php", ClassDescription::new("ATestHelper"));

        let classes = introspector
            .describe(&SourceFile::new("tests/ATest.php"))
            .unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(
            classes[0].file.as_ref().map(RelativePath::as_str),
            Some("tests/ATest.php")
        );
        assert!(introspector
            .describe(&SourceFile::new("tests/Other.php"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn malformed_file_fails_classes_in() {
        let introspector = FakeIntrospector::new().malformed("tests/Broken.php");
        let files = SourceFiles::from_paths(["tests/Broken.php"]);
        assert!(introspector
            .classes_in(&files, &Filter::test_conventions())
            .is_err());
    }
}
