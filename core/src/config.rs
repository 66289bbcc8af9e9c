//! Parsed suite configuration.
//!
//! These types are what a [`ConfigLoader`] produces, whatever the on-disk
//! format: PHPUnit XML ([`PhpUnitConfigLoader`](crate::PhpUnitConfigLoader))
//! or a YAML/JSON manifest ([`ManifestLoader`](crate::ManifestLoader)).
//! Order is significant everywhere: suites, directories, excludes and files
//! are resolved in the order they are declared.
//!
//! ```yaml
//! suites:
//!   - name: unit
//!     directories:
//!       - path: tests/Unit
//!         suffix: Test.php
//!       - path: tests/Php8
//!         version: "8.0.0"
//!         operator: ">="
//!     exclude:
//!       - path: tests/Unit/Fixtures
//!     files:
//!       - path: tests/Legacy/OldTest.php
//!         version: "8.0.0"
//!         operator: "<"
//! ```

use crate::{FileConstraint, SuiteError, VersionConstraint};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every suite declared by one configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfiguration {
    /// Suites in declaration order. Names are not required to be unique.
    #[serde(default)]
    pub suites: Vec<SuiteDeclaration>,
}

/// One declared suite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteDeclaration {
    /// Suite name.
    pub name: String,
    /// Directories to scan.
    #[serde(default)]
    pub directories: Vec<DirectoryDeclaration>,
    /// Files or directories removed from the scan.
    #[serde(default)]
    pub exclude: Vec<ExcludeDeclaration>,
    /// Files added after exclusions.
    #[serde(default)]
    pub files: Vec<FileDeclaration>,
}

impl SuiteDeclaration {
    /// An empty suite.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a directory (builder pattern).
    #[must_use]
    pub fn directory(mut self, directory: DirectoryDeclaration) -> Self {
        self.directories.push(directory);
        self
    }

    /// Add an exclusion (builder pattern).
    #[must_use]
    pub fn exclude(mut self, path: impl Into<String>) -> Self {
        self.exclude.push(ExcludeDeclaration { path: path.into() });
        self
    }

    /// Add an included file (builder pattern).
    #[must_use]
    pub fn file(mut self, file: FileDeclaration) -> Self {
        self.files.push(file);
        self
    }
}

/// A directory to scan, narrowed by file-name affixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryDeclaration {
    /// Project-relative directory path.
    pub path: String,
    /// File-name prefix, `""` for none.
    #[serde(default)]
    pub prefix: String,
    /// File-name suffix, `""` for none.
    #[serde(default)]
    pub suffix: String,
    /// Platform version gate.
    #[serde(flatten)]
    pub version: VersionConstraint,
}

impl DirectoryDeclaration {
    /// An unconstrained directory.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the prefix (builder pattern).
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the suffix (builder pattern).
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set the version gate (builder pattern).
    #[must_use]
    pub fn version(mut self, version: VersionConstraint) -> Self {
        self.version = version;
        self
    }

    /// The file constraint built from the prefix and suffix.
    #[must_use]
    pub fn constraint(&self) -> FileConstraint {
        FileConstraint::from_affixes(&self.prefix, &self.suffix)
    }
}

/// A file or directory removed from a suite. Never version gated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludeDeclaration {
    /// Project-relative path.
    pub path: String,
}

/// A file added to a suite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDeclaration {
    /// Project-relative file path.
    pub path: String,
    /// Platform version gate.
    #[serde(flatten)]
    pub version: VersionConstraint,
}

impl FileDeclaration {
    /// An unconstrained file.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the version gate (builder pattern).
    #[must_use]
    pub fn version(mut self, version: VersionConstraint) -> Self {
        self.version = version;
        self
    }
}

/// Loads a [`SuiteConfiguration`] from a file.
pub trait ConfigLoader {
    /// Load and parse the configuration at `path`.
    ///
    /// # Errors
    ///
    /// - [`SuiteError::ConfigNotFound`] if `path` does not exist
    /// - [`SuiteError::ConfigMalformed`] if it does not parse
    fn load(&self, path: &Path) -> Result<SuiteConfiguration, SuiteError>;
}

/// Read a configuration file, mapping I/O errors to loader errors.
pub(crate) fn read_config(path: &Path) -> Result<String, SuiteError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SuiteError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SuiteError::ConfigMalformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    })
}
