//! Resolved suites.

use crate::{Filter, SourceFiles};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::ops::Index;

/// One resolved suite: its name, its files and the filter for its classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSuiteConfig {
    /// Suite name as declared.
    pub name: String,
    /// Resolved files, in resolution order.
    pub source: SourceFiles,
    /// Filter deciding which classes and methods of `source` are tests.
    pub filter: Filter,
}

impl TestSuiteConfig {
    /// Create a resolved suite.
    pub fn new(name: impl Into<String>, source: SourceFiles, filter: Filter) -> Self {
        Self {
            name: name.into(),
            source,
            filter,
        }
    }
}

// Serialized as `{ name, files }`; the filter is left out.
impl Serialize for TestSuiteConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TestSuiteConfig", 2)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("files", &self.source)?;
        state.end()
    }
}

/// Every resolved suite, in declaration order.
///
/// Iteration, indexing and [`as_slice`](Self::as_slice) all observe the same
/// sequence. There is no way to mutate the collection once built.
///
/// ```
/// use suitex::{Filter, SourceFiles, TestSuiteConfig, TestSuitesConfig};
///
/// let suites = TestSuitesConfig::new(vec![
///     TestSuiteConfig::new("unit", SourceFiles::new(), Filter::default()),
///     TestSuiteConfig::new("feature", SourceFiles::new(), Filter::default()),
/// ]);
///
/// assert_eq!(suites.len(), 2);
/// assert_eq!(suites[1].name, "feature");
/// assert_eq!(suites.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(), ["unit", "feature"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TestSuitesConfig {
    suites: Vec<TestSuiteConfig>,
}

impl TestSuitesConfig {
    /// Wrap an ordered sequence of suites.
    #[must_use]
    pub fn new(suites: Vec<TestSuiteConfig>) -> Self {
        Self { suites }
    }

    /// Number of suites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.suites.len()
    }

    /// Returns `true` if no suite was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Suites in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, TestSuiteConfig> {
        self.suites.iter()
    }

    /// Indexed view over the same storage as [`iter`](Self::iter).
    #[must_use]
    pub fn as_slice(&self) -> &[TestSuiteConfig] {
        &self.suites
    }

    /// The suite at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TestSuiteConfig> {
        self.suites.get(index)
    }

    /// The first suite named `name`. Names are not unique; later suites with
    /// the same name are only reachable by index or iteration.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&TestSuiteConfig> {
        self.suites.iter().find(|s| s.name == name)
    }

    /// Every distinct file across all suites, in first-seen order.
    #[must_use]
    pub fn all_files(&self) -> SourceFiles {
        SourceFiles::concat(self.suites.iter().map(|s| &s.source))
    }
}

impl Index<usize> for TestSuitesConfig {
    type Output = TestSuiteConfig;

    fn index(&self, index: usize) -> &Self::Output {
        &self.suites[index]
    }
}

impl FromIterator<TestSuiteConfig> for TestSuitesConfig {
    fn from_iter<T: IntoIterator<Item = TestSuiteConfig>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for TestSuitesConfig {
    type Item = TestSuiteConfig;
    type IntoIter = std::vec::IntoIter<TestSuiteConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.suites.into_iter()
    }
}

impl<'a> IntoIterator for &'a TestSuitesConfig {
    type Item = &'a TestSuiteConfig;
    type IntoIter = std::slice::Iter<'a, TestSuiteConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.suites.iter()
    }
}
