//! Resolving suite declarations into file sets.
//!
//! Each suite is a fold over immutable [`SourceFiles`] values:
//!
//! 1. **scan**: every directory whose version gate passes, narrowed by its
//!    [`FileConstraint`](crate::FileConstraint), unioned in declaration order
//! 2. **exclude**: every exclude entry (file or directory, never gated) is
//!    resolved, unioned and removed from the scan
//! 3. **include**: every file entry whose gate passes is resolved, unioned and
//!    added, so an included file survives a matching exclusion
//!
//! The filter is attached unchanged to every suite.

use crate::{
    FileError, FileResolver, Filter, SourceFiles, SuiteConfiguration, SuiteDeclaration,
    SuiteError, TestSuiteConfig, TestSuitesConfig, VersionGate,
};
use std::path::Path;
use tracing::{debug, info, warn};

/// Anything that produces the resolved suites of a project.
pub trait SuiteResolver {
    /// Resolve every declared suite, in declaration order.
    ///
    /// # Errors
    ///
    /// Any loader or filesystem failure aborts the whole call; no partial
    /// suite list is returned.
    fn resolve(&self) -> Result<TestSuitesConfig, SuiteError>;
}

/// Applies the scan/exclude/include fold to declarations.
///
/// Borrowing only, so one instance can resolve any number of configurations
/// against the same project and platform.
#[derive(Clone, Copy)]
pub struct DeclarationResolver<'a> {
    files: &'a dyn FileResolver,
    gate: &'a VersionGate,
}

impl std::fmt::Debug for DeclarationResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeclarationResolver")
            .field("root", &self.files.root())
            .field("platform", self.gate.platform())
            .finish()
    }
}

impl<'a> DeclarationResolver<'a> {
    /// Resolve against `files`, gating on `gate`.
    pub fn new(files: &'a dyn FileResolver, gate: &'a VersionGate) -> Self {
        Self { files, gate }
    }

    /// Resolve every suite of `config`, attaching `filter` to each.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Resolution`] for the first filesystem failure.
    pub fn resolve_all(
        &self,
        config: &SuiteConfiguration,
        filter: &Filter,
    ) -> Result<TestSuitesConfig, SuiteError> {
        config
            .suites
            .iter()
            .map(|suite| self.resolve_suite(suite, filter))
            .collect()
    }

    /// Resolve one suite.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Resolution`] naming the suite and the path being
    /// processed.
    pub fn resolve_suite(
        &self,
        suite: &SuiteDeclaration,
        filter: &Filter,
    ) -> Result<TestSuiteConfig, SuiteError> {
        let scanned = self.scan(suite)?;
        let excluded = self.exclusions(suite)?;
        let included = self.inclusions(suite)?;

        let source = scanned.remove(&excluded).add(&included);

        info!(
            suite = %suite.name,
            scanned = scanned.len(),
            excluded = excluded.len(),
            included = included.len(),
            files = source.len(),
            "resolved suite"
        );
        Ok(TestSuiteConfig::new(suite.name.clone(), source, filter.clone()))
    }

    fn scan(&self, suite: &SuiteDeclaration) -> Result<SourceFiles, SuiteError> {
        let mut sets = Vec::with_capacity(suite.directories.len());
        for dir in &suite.directories {
            if !self.gate.allows(&dir.version) {
                debug!(
                    suite = %suite.name,
                    dir = %dir.path,
                    constraint = %dir.version,
                    platform = %self.gate.platform(),
                    "version gate skipped directory"
                );
                continue;
            }
            let constraint = dir.constraint();
            let path = self.files.absolute_path(&dir.path);
            let found = self
                .files
                .files_under(&path, &constraint)
                .map_err(|e| wrap(&suite.name, &path, e))?;
            debug!(
                suite = %suite.name,
                dir = %dir.path,
                %constraint,
                files = found.len(),
                "scanned directory"
            );
            sets.push(found);
        }
        Ok(SourceFiles::concat(&sets))
    }

    fn exclusions(&self, suite: &SuiteDeclaration) -> Result<SourceFiles, SuiteError> {
        let mut sets = Vec::with_capacity(suite.exclude.len());
        for exclude in &suite.exclude {
            let path = self.files.absolute_path(&exclude.path);
            let found = self
                .files
                .files_at(&path)
                .map_err(|e| wrap(&suite.name, &path, e))?;
            if found.is_empty() {
                warn!(suite = %suite.name, path = %exclude.path, "excluded path matched no files");
            }
            sets.push(found);
        }
        Ok(SourceFiles::concat(&sets))
    }

    fn inclusions(&self, suite: &SuiteDeclaration) -> Result<SourceFiles, SuiteError> {
        let mut sets = Vec::with_capacity(suite.files.len());
        for file in &suite.files {
            if !self.gate.allows(&file.version) {
                debug!(
                    suite = %suite.name,
                    file = %file.path,
                    constraint = %file.version,
                    platform = %self.gate.platform(),
                    "version gate skipped file"
                );
                continue;
            }
            let path = self.files.absolute_path(&file.path);
            let found = self
                .files
                .files_at(&path)
                .map_err(|e| wrap(&suite.name, &path, e))?;
            if found.is_empty() {
                warn!(suite = %suite.name, path = %file.path, "included file does not exist");
            }
            sets.push(found);
        }
        Ok(SourceFiles::concat(&sets))
    }
}

fn wrap(suite: &str, path: &Path, source: FileError) -> SuiteError {
    SuiteError::Resolution {
        suite: suite.to_string(),
        path: path.to_path_buf(),
        source,
    }
}
