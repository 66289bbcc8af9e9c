//! YAML/JSON suite manifests.
//!
//! A manifest carries the same suite declarations as `phpunit.xml`, plus an
//! optional `filter` section replacing the test convention. The format is
//! picked by file extension: `.json` is JSON, anything else is YAML.
//!
//! ```yaml
//! suites:
//!   - name: unit
//!     directories:
//!       - path: tests/Unit
//!         suffix: Spec.php
//! filter:
//!   class: { type: implements, capability: Spec }
//!   methods:
//!     type: or
//!     predicates:
//!       - { type: name_prefix, prefix: it }
//!       - { type: attribute, name: Example }
//! ```
//!
//! Predicates use `#[serde(tag = "type")]` discriminated unions:
//!
//! ```json
//! { "type": "name_prefix", "prefix": "test" }
//! { "type": "and", "predicates": [...] }
//! { "type": "or", "predicates": [...] }
//! { "type": "not", "predicate": { ... } }
//! ```

use crate::config::read_config;
use crate::filter::{TEST_ATTRIBUTE, TEST_CAPABILITY, TEST_DOC_ANNOTATION, TEST_METHOD_PREFIX};
use crate::{
    ClassRule, ConfigLoader, Filter, MethodRule, Predicate, SuiteConfiguration, SuiteDeclaration,
    SuiteError,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A parsed manifest: suites plus an optional filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Suites in declaration order.
    #[serde(default)]
    pub suites: Vec<SuiteDeclaration>,
    /// Filter replacing the test convention.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterConfig>,
}

impl Manifest {
    /// The suite declarations, without the filter.
    #[must_use]
    pub fn configuration(&self) -> SuiteConfiguration {
        SuiteConfiguration {
            suites: self.suites.clone(),
        }
    }

    /// The declared filter, or the test convention.
    #[must_use]
    pub fn filter(&self) -> Filter {
        self.filter
            .as_ref()
            .map_or_else(Filter::test_conventions, FilterConfig::to_filter)
    }
}

/// Serde form of a [`Filter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Class predicate. Defaults to implementing `Test`.
    #[serde(default = "default_class")]
    pub class: ClassPredicateConfig,
    /// Method predicate. Defaults to the test method convention.
    #[serde(default = "default_methods")]
    pub methods: MethodPredicateConfig,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            class: default_class(),
            methods: default_methods(),
        }
    }
}

impl FilterConfig {
    /// Build the runtime filter.
    #[must_use]
    pub fn to_filter(&self) -> Filter {
        Filter::from_predicates(self.class.to_predicate(), self.methods.to_predicate())
    }
}

fn default_class() -> ClassPredicateConfig {
    ClassPredicateConfig::Implements {
        capability: TEST_CAPABILITY.to_string(),
    }
}

fn default_methods() -> MethodPredicateConfig {
    MethodPredicateConfig::Or {
        predicates: vec![
            MethodPredicateConfig::NamePrefix {
                prefix: TEST_METHOD_PREFIX.to_string(),
            },
            MethodPredicateConfig::DocAnnotation {
                tag: TEST_DOC_ANNOTATION.to_string(),
            },
            MethodPredicateConfig::Attribute {
                name: TEST_ATTRIBUTE.to_string(),
            },
        ],
    }
}

/// Serde form of a class predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassPredicateConfig {
    /// [`ClassRule::ImplementsCapability`].
    Implements {
        /// Capability name.
        capability: String,
    },
    /// All predicates must match.
    And {
        /// Child predicates.
        predicates: Vec<ClassPredicateConfig>,
    },
    /// Any predicate must match.
    Or {
        /// Child predicates.
        predicates: Vec<ClassPredicateConfig>,
    },
    /// Inverts the inner predicate.
    Not {
        /// The predicate to negate.
        predicate: Box<ClassPredicateConfig>,
    },
}

impl ClassPredicateConfig {
    /// Build the runtime predicate.
    #[must_use]
    pub fn to_predicate(&self) -> Predicate<ClassRule> {
        match self {
            Self::Implements { capability } => {
                Predicate::Rule(ClassRule::ImplementsCapability(capability.clone()))
            }
            Self::And { predicates } => {
                Predicate::And(predicates.iter().map(Self::to_predicate).collect())
            }
            Self::Or { predicates } => {
                Predicate::Or(predicates.iter().map(Self::to_predicate).collect())
            }
            Self::Not { predicate } => predicate.to_predicate().negate(),
        }
    }
}

/// Serde form of a method predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MethodPredicateConfig {
    /// [`MethodRule::NamePrefix`].
    NamePrefix {
        /// Name prefix.
        prefix: String,
    },
    /// [`MethodRule::HasDocAnnotation`].
    DocAnnotation {
        /// Annotation tag, including the `@`.
        tag: String,
    },
    /// [`MethodRule::HasAttribute`].
    Attribute {
        /// Attribute name.
        name: String,
    },
    /// All predicates must match.
    And {
        /// Child predicates.
        predicates: Vec<MethodPredicateConfig>,
    },
    /// Any predicate must match.
    Or {
        /// Child predicates.
        predicates: Vec<MethodPredicateConfig>,
    },
    /// Inverts the inner predicate.
    Not {
        /// The predicate to negate.
        predicate: Box<MethodPredicateConfig>,
    },
}

impl MethodPredicateConfig {
    /// Build the runtime predicate.
    #[must_use]
    pub fn to_predicate(&self) -> Predicate<MethodRule> {
        match self {
            Self::NamePrefix { prefix } => Predicate::Rule(MethodRule::NamePrefix(prefix.clone())),
            Self::DocAnnotation { tag } => Predicate::Rule(MethodRule::HasDocAnnotation(tag.clone())),
            Self::Attribute { name } => Predicate::Rule(MethodRule::HasAttribute(name.clone())),
            Self::And { predicates } => {
                Predicate::And(predicates.iter().map(Self::to_predicate).collect())
            }
            Self::Or { predicates } => {
                Predicate::Or(predicates.iter().map(Self::to_predicate).collect())
            }
            Self::Not { predicate } => predicate.to_predicate().negate(),
        }
    }
}

/// [`ConfigLoader`] for YAML/JSON manifests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestLoader;

impl ManifestLoader {
    /// Load the whole manifest, filter included.
    ///
    /// # Errors
    ///
    /// - [`SuiteError::ConfigNotFound`] if `path` does not exist
    /// - [`SuiteError::ConfigMalformed`] if it is not a valid manifest
    pub fn load_manifest(&self, path: &Path) -> Result<Manifest, SuiteError> {
        let content = read_config(path)?;
        let malformed = |reason: String| SuiteError::ConfigMalformed {
            path: path.to_path_buf(),
            reason,
        };

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let manifest: Manifest = if is_json {
            serde_json::from_str(&content).map_err(|e| malformed(format!("JSON parse error: {e}")))?
        } else {
            // .yaml, .yml and anything else
            serde_yaml::from_str(&content).map_err(|e| malformed(format!("YAML parse error: {e}")))?
        };

        debug!(
            path = %path.display(),
            suites = manifest.suites.len(),
            custom_filter = manifest.filter.is_some(),
            "loaded manifest"
        );
        Ok(manifest)
    }
}

impl ConfigLoader for ManifestLoader {
    fn load(&self, path: &Path) -> Result<SuiteConfiguration, SuiteError> {
        self.load_manifest(path).map(|m| SuiteConfiguration { suites: m.suites })
    }
}
