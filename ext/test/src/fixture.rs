//! Conformance fixture runner
//!
//! Loads YAML fixtures describing a project, its suite declarations and the
//! expected resolution, and runs them against the suitex engine.
//!
//! ```yaml
//! name: include_overrides_exclude
//! description: An included file survives a matching exclusion
//! platform: "8.1.0"
//! project:
//!   - tests/All/ATest.php
//! classes:
//!   tests/All/ATest.php:
//!     - name: ATest
//!       capabilities: [Test]
//!       methods:
//!         - name: testIt
//! suites:
//!   - name: all
//!     directories:
//!       - path: tests/All
//!     exclude:
//!       - path: tests/All
//!     files:
//!       - path: tests/All/ATest.php
//! expect:
//!   - name: all
//!     files: [tests/All/ATest.php]
//!     classes:
//!       ATest: [testIt]
//! ```

use crate::{FakeIntrospector, FakeProject};
use serde::Deserialize;
use std::collections::BTreeMap;
use suitex::prelude::*;
use suitex::{FilterConfig, SuiteConfiguration, SuiteDeclaration};

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Running platform version.
    pub platform: String,
    /// Files of the in-memory project.
    pub project: Vec<String>,
    /// Classes declared per file, for filter checks.
    #[serde(default)]
    pub classes: BTreeMap<String, Vec<ClassFixture>>,
    pub suites: Vec<SuiteDeclaration>,
    /// Filter replacing the test convention.
    #[serde(default)]
    pub filter: Option<FilterConfig>,
    pub expect: Vec<ExpectedSuite>,
}

/// A class declared in a fixture file
#[derive(Debug, Deserialize)]
pub struct ClassFixture {
    pub name: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodFixture>,
}

/// A method declared in a fixture class
#[derive(Debug, Deserialize)]
pub struct MethodFixture {
    pub name: String,
    #[serde(default)]
    pub doc_annotations: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// Expected resolution of one suite
#[derive(Debug, Deserialize)]
pub struct ExpectedSuite {
    pub name: String,
    pub files: Vec<String>,
    /// Selected classes and their test methods. Only checked when present.
    #[serde(default)]
    pub classes: Option<BTreeMap<String, Vec<String>>>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder: Convert fixture to suitex types
// ═══════════════════════════════════════════════════════════════════════════════

impl ClassFixture {
    fn build(&self) -> ClassDescription {
        let class = self
            .capabilities
            .iter()
            .fold(ClassDescription::new(&self.name), |c, cap| c.with_capability(cap));
        self.methods
            .iter()
            .fold(class, |c, m| c.with_method(m.build()))
    }
}

impl MethodFixture {
    fn build(&self) -> MethodDescription {
        let method = self
            .doc_annotations
            .iter()
            .fold(MethodDescription::new(&self.name), |m, tag| m.with_doc_annotation(tag));
        self.attributes
            .iter()
            .fold(method, |m, attr| m.with_attribute(attr))
    }
}

impl Fixture {
    /// The in-memory project
    pub fn build_project(&self) -> FakeProject {
        FakeProject::from_paths(&self.project)
    }

    /// The in-memory introspector
    pub fn build_introspector(&self) -> FakeIntrospector {
        self.classes
            .iter()
            .flat_map(|(file, classes)| classes.iter().map(move |c| (file, c.build())))
            .fold(FakeIntrospector::new(), |i, (file, class)| i.with_class(file, class))
    }

    /// The filter the suites should carry
    pub fn build_filter(&self) -> Filter {
        self.filter
            .as_ref()
            .map_or_else(Filter::test_conventions, FilterConfig::to_filter)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// What one suite actually resolved to
#[derive(Debug, PartialEq, Eq)]
pub struct ActualSuite {
    pub name: String,
    pub files: Vec<String>,
    pub classes: BTreeMap<String, Vec<String>>,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Resolve the fixture's suites
    pub fn run(&self) -> Result<Vec<ActualSuite>, String> {
        let filter = self.build_filter();
        let introspector = self.build_introspector();
        let configuration = SuiteConfiguration {
            suites: self.suites.clone(),
        };

        let suites = ResolverBuilder::for_project(self.build_project(), self.platform.as_str())
            .using_configuration(configuration, filter)
            .build()
            .and_then(|r| r.resolve())
            .map_err(|e| e.to_string())?;

        suites
            .iter()
            .map(|suite| {
                let classes = introspector
                    .classes_in(&suite.source, &suite.filter)
                    .map_err(|e| e.to_string())?
                    .into_iter()
                    .map(|c| {
                        let methods = c.method_names().map(str::to_string).collect();
                        (c.name, methods)
                    })
                    .collect();
                Ok(ActualSuite {
                    name: suite.name.clone(),
                    files: suite.source.paths().map(str::to_string).collect(),
                    classes,
                })
            })
            .collect()
    }

    /// Run the fixture and panic on the first mismatch
    pub fn run_and_assert(&self) {
        let actual = self
            .run()
            .unwrap_or_else(|e| panic!("Fixture '{}' failed to resolve: {e}", self.name));

        assert_eq!(
            actual.len(),
            self.expect.len(),
            "Fixture '{}': expected {} suites, got {:?}",
            self.name,
            self.expect.len(),
            actual.iter().map(|s| &s.name).collect::<Vec<_>>()
        );

        for (expected, actual) in self.expect.iter().zip(&actual) {
            assert_eq!(
                actual.name, expected.name,
                "Fixture '{}': suite order differs",
                self.name
            );
            assert_eq!(
                actual.files, expected.files,
                "Fixture '{}' suite '{}': files differ",
                self.name, expected.name
            );
            if let Some(classes) = &expected.classes {
                assert_eq!(
                    &actual.classes, classes,
                    "Fixture '{}' suite '{}': selected classes differ",
                    self.name, expected.name
                );
            }
        }
    }
}
