//! suitex - test-suite resolution for PHP projects
//!
//! Turns declarative suite configuration (`phpunit.xml` or a YAML/JSON
//! manifest) into, per named suite, an ordered set of source files and the
//! filter that decides which classes and methods in them are tests.
//!
//! # Architecture
//!
//! - [`VersionGate`] — compares declared versions against the running platform
//! - [`FileConstraint`] — prefix/suffix predicate over file names
//! - [`SourceFiles`] — ordered, deduplicated file set with `add`/`remove`
//! - [`Predicate<R>`] — boolean composition (And, Or, Not) over atomic [`Rule`]s
//! - [`Filter`] — class predicate AND method predicate
//! - [`SuiteResolver`] — scan, exclude, include, per declared suite
//! - [`TestSuitesConfig`] — the resolved suites, in declaration order
//!
//! The filesystem ([`FileResolver`]), configuration loading ([`ConfigLoader`])
//! and class introspection ([`ClassIntrospector`]) are traits; [`ProjectFiles`],
//! [`PhpUnitConfigLoader`] and [`ManifestLoader`] are the bundled
//! implementations.
//!
//! # Key Invariants
//!
//! 1. **Order is preserved**: suites, directories and files come out in the
//!    order they were declared; sets keep the first occurrence of a path.
//!
//! 2. **Inclusion beats exclusion**: explicitly included files are added after
//!    exclusions are removed.
//!
//! 3. **Versions compare numerically**: `8.10 > 8.9`, and `8.0 == 8.0.0`.
//!
//! # Example
//!
//! ```
//! use suitex::prelude::*;
//!
//! let scanned = SourceFiles::from_paths(["tests/ATest.php", "tests/Fixtures/BTest.php"]);
//! let excluded = SourceFiles::from_paths(["tests/Fixtures/BTest.php"]);
//! let included = SourceFiles::from_paths(["tests/Fixtures/BTest.php", "tests/Extra.php"]);
//!
//! // Inclusions are applied after exclusions
//! let source = scanned.remove(&excluded).add(&included);
//! assert_eq!(
//!     source.paths().collect::<Vec<_>>(),
//!     ["tests/ATest.php", "tests/Fixtures/BTest.php", "tests/Extra.php"]
//! );
//!
//! let gate = VersionGate::new("8.1.0");
//! assert!(gate.satisfied("8.0.0", VersionOperator::Ge));
//! assert!(!gate.satisfied("8.0.0", VersionOperator::Lt));
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod builder;
mod config;
mod file_constraint;
mod files;
mod filter;
mod introspect;
mod manifest;
mod phpunit;
mod predicate;
mod resolver;
mod source_files;
mod suite;
mod trace;
mod version;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use file_constraint::FileConstraint;
pub use predicate::{Predicate, Rule};
pub use source_files::{RelativePath, SourceFile, SourceFiles};
pub use suite::{TestSuiteConfig, TestSuitesConfig};
pub use version::{UnknownOperator, Version, VersionConstraint, VersionGate, VersionOperator};

// Filter and introspection
pub use filter::{
    ClassRule, Filter, MethodRule, TEST_ATTRIBUTE, TEST_CAPABILITY, TEST_DOC_ANNOTATION,
    TEST_METHOD_PREFIX,
};
pub use introspect::{
    ClassDescription, ClassIntrospector, IntrospectError, MethodDescription, TestClass,
};

// Trace types
pub use trace::{FilterTrace, MethodTrace, PredicateTrace};

// Configuration
pub use config::{
    ConfigLoader, DirectoryDeclaration, ExcludeDeclaration, FileDeclaration, SuiteConfiguration,
    SuiteDeclaration,
};
pub use manifest::{
    ClassPredicateConfig, FilterConfig, Manifest, ManifestLoader, MethodPredicateConfig,
};
pub use phpunit::{
    locate_config, PhpUnitConfigLoader, DEFAULT_CONFIG_FILE, DEFAULT_DIRECTORY_SUFFIX,
    DIST_CONFIG_FILE,
};

// Resolution
pub use builder::{Resolver, ResolverBuilder, Strategy};
pub use files::{FileError, FileResolver, ProjectFiles};
pub use resolver::{DeclarationResolver, SuiteResolver};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use suitex::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Filter
        ClassDescription,
        ClassIntrospector,
        ClassRule,
        // Configuration
        ConfigLoader,
        FileConstraint,
        FileResolver,
        Filter,
        MethodDescription,
        MethodRule,
        Predicate,
        ProjectFiles,
        ResolverBuilder,
        SourceFile,
        SourceFiles,
        // Errors
        SuiteError,
        SuiteResolver,
        TestClass,
        TestSuiteConfig,
        TestSuitesConfig,
        VersionGate,
        VersionOperator,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from building a resolver or resolving suites.
///
/// Any of these aborts the whole [`SuiteResolver::resolve`] call.
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    /// [`ResolverBuilder::build`] was called before a strategy was chosen.
    #[error("no resolver strategy configured")]
    Configuration,
    /// The configuration file does not exist.
    #[error("configuration file \"{path}\" not found")]
    ConfigNotFound {
        /// Path that was looked up.
        path: std::path::PathBuf,
    },
    /// The configuration file exists but cannot be read or parsed.
    #[error("invalid configuration \"{path}\": {reason}")]
    ConfigMalformed {
        /// Offending file.
        path: std::path::PathBuf,
        /// What went wrong.
        reason: String,
    },
    /// A filesystem failure while resolving a suite.
    #[error("cannot resolve suite \"{suite}\" at \"{path}\": {source}")]
    Resolution {
        /// Suite being resolved.
        suite: String,
        /// Path being processed.
        path: std::path::PathBuf,
        /// Underlying failure.
        #[source]
        source: FileError,
    },
}
