//! Assembling a [`SuiteResolver`] for a project.
//!
//! ```no_run
//! use suitex::prelude::*;
//!
//! let resolver = ResolverBuilder::for_project(ProjectFiles::new("/srv/app"), "8.2.0")
//!     .using_phpunit()
//!     .build()?;
//!
//! for suite in &resolver.resolve()? {
//!     println!("{}: {} files", suite.name, suite.source.len());
//! }
//! # Ok::<(), suitex::SuiteError>(())
//! ```

use crate::manifest::ManifestLoader;
use crate::phpunit::{locate_config, PhpUnitConfigLoader};
use crate::resolver::DeclarationResolver;
use crate::{
    ConfigLoader, FileResolver, Filter, SuiteConfiguration, SuiteError, SuiteResolver,
    TestSuitesConfig, Version, VersionGate,
};
use std::path::PathBuf;
use tracing::debug;

/// Where suite declarations come from and which filter applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// `phpunit.xml` with the test convention filter.
    ///
    /// `None` looks up `phpunit.xml`, then `phpunit.xml.dist`, in the project
    /// root.
    PhpUnit {
        /// Project-relative configuration file.
        config_file: Option<PathBuf>,
    },
    /// A YAML/JSON manifest, with its own filter when it declares one.
    Manifest {
        /// Project-relative manifest file.
        config_file: PathBuf,
    },
    /// Declarations already in memory.
    Declared {
        /// Suite declarations.
        configuration: SuiteConfiguration,
        /// Filter attached to every suite.
        filter: Filter,
    },
}

/// Builder for a [`Resolver`].
///
/// A strategy must be chosen before [`build`](Self::build); choosing another
/// one replaces it.
#[derive(Debug)]
pub struct ResolverBuilder<F> {
    files: F,
    gate: VersionGate,
    strategy: Option<Strategy>,
}

impl<F: FileResolver> ResolverBuilder<F> {
    /// Start building a resolver for the project behind `files`, gating
    /// version constraints on `platform`.
    pub fn for_project(files: F, platform: impl Into<Version>) -> Self {
        Self {
            files,
            gate: VersionGate::new(platform),
            strategy: None,
        }
    }

    /// Use the project's `phpunit.xml` (or `phpunit.xml.dist`).
    #[must_use]
    pub fn using_phpunit(self) -> Self {
        self.using(Strategy::PhpUnit { config_file: None })
    }

    /// Use a specific PHPUnit configuration file.
    #[must_use]
    pub fn using_phpunit_file(self, config_file: impl Into<PathBuf>) -> Self {
        self.using(Strategy::PhpUnit {
            config_file: Some(config_file.into()),
        })
    }

    /// Use a YAML/JSON manifest.
    #[must_use]
    pub fn using_manifest(self, config_file: impl Into<PathBuf>) -> Self {
        self.using(Strategy::Manifest {
            config_file: config_file.into(),
        })
    }

    /// Use declarations already in memory.
    #[must_use]
    pub fn using_configuration(self, configuration: SuiteConfiguration, filter: Filter) -> Self {
        self.using(Strategy::Declared {
            configuration,
            filter,
        })
    }

    /// Use `strategy`.
    #[must_use]
    pub fn using(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Finish the resolver.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Configuration`] if no strategy was chosen.
    pub fn build(self) -> Result<Resolver<F>, SuiteError> {
        let strategy = self.strategy.ok_or(SuiteError::Configuration)?;
        debug!(?strategy, platform = %self.gate.platform(), "built suite resolver");
        Ok(Resolver {
            files: self.files,
            gate: self.gate,
            strategy,
        })
    }
}

/// A configured [`SuiteResolver`].
///
/// Holds no results: every [`resolve`](SuiteResolver::resolve) reloads the
/// configuration and rescans the project.
#[derive(Debug)]
pub struct Resolver<F> {
    files: F,
    gate: VersionGate,
    strategy: Strategy,
}

impl<F: FileResolver> Resolver<F> {
    /// The selected strategy.
    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// The platform version constraints are checked against.
    #[must_use]
    pub fn platform(&self) -> &Version {
        self.gate.platform()
    }

    /// The project's file resolver.
    #[must_use]
    pub fn files(&self) -> &F {
        &self.files
    }

    /// Load the declarations and filter the strategy points at.
    ///
    /// # Errors
    ///
    /// Returns the loader's [`SuiteError::ConfigNotFound`] or
    /// [`SuiteError::ConfigMalformed`] unchanged.
    pub fn load(&self) -> Result<(SuiteConfiguration, Filter), SuiteError> {
        let root = self.files.root();
        match &self.strategy {
            Strategy::PhpUnit { config_file } => {
                let path = locate_config(root, config_file.as_deref());
                Ok((PhpUnitConfigLoader.load(&path)?, Filter::test_conventions()))
            }
            Strategy::Manifest { config_file } => {
                let manifest = ManifestLoader.load_manifest(&root.join(config_file))?;
                Ok((manifest.configuration(), manifest.filter()))
            }
            Strategy::Declared {
                configuration,
                filter,
            } => Ok((configuration.clone(), filter.clone())),
        }
    }
}

impl<F: FileResolver> SuiteResolver for Resolver<F> {
    fn resolve(&self) -> Result<TestSuitesConfig, SuiteError> {
        let (configuration, filter) = self.load()?;
        DeclarationResolver::new(&self.files, &self.gate).resolve_all(&configuration, &filter)
    }
}
