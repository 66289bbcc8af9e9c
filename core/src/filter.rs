//! `Filter` — which classes and methods are tests
//!
//! A filter is a class predicate AND a method predicate:
//!
//! - a class is selected when the class predicate holds;
//! - a method of a selected class is kept when the method predicate holds.
//!
//! A selected class with no qualifying method is still selected (it just
//! contributes no test methods).
//!
//! # Available Rules
//!
//! - [`ClassRule::ImplementsCapability`] — class declares or inherits a capability
//! - [`MethodRule::NamePrefix`] — method name starts with a prefix
//! - [`MethodRule::HasDocAnnotation`] — doc comment carries a tag
//! - [`MethodRule::HasAttribute`] — method carries a language attribute

use crate::{
    ClassDescription, FilterTrace, MethodDescription, MethodTrace, Predicate, Rule, TestClass,
};
use std::fmt;

/// Capability every test class implements under the test convention.
pub const TEST_CAPABILITY: &str = "Test";

/// Method name prefix marking a test under the test convention.
pub const TEST_METHOD_PREFIX: &str = "test";

/// Doc annotation marking a test under the test convention.
pub const TEST_DOC_ANNOTATION: &str = "@test";

/// Attribute marking a test under the test convention.
pub const TEST_ATTRIBUTE: &str = "Test";

/// Atomic predicate over a [`ClassDescription`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassRule {
    /// The class declares or inherits this capability.
    ImplementsCapability(String),
}

impl Rule for ClassRule {
    type Subject = ClassDescription;

    fn holds(&self, class: &ClassDescription) -> bool {
        match self {
            Self::ImplementsCapability(c) => class.capabilities.iter().any(|cap| cap == c),
        }
    }
}

impl fmt::Display for ClassRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImplementsCapability(c) => write!(f, "implements {c}"),
        }
    }
}

/// Atomic predicate over a [`MethodDescription`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodRule {
    /// Method name starts with this prefix.
    NamePrefix(String),
    /// Doc comment carries this annotation tag.
    HasDocAnnotation(String),
    /// Method carries this attribute.
    HasAttribute(String),
}

impl Rule for MethodRule {
    type Subject = MethodDescription;

    fn holds(&self, method: &MethodDescription) -> bool {
        match self {
            Self::NamePrefix(p) => method.name.starts_with(p.as_str()),
            Self::HasDocAnnotation(tag) => method.doc_annotations.iter().any(|t| t == tag),
            Self::HasAttribute(attr) => method.attributes.iter().any(|a| a == attr),
        }
    }
}

impl fmt::Display for MethodRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamePrefix(p) => write!(f, "name starts with \"{p}\""),
            Self::HasDocAnnotation(t) => write!(f, "doc annotation {t}"),
            Self::HasAttribute(a) => write!(f, "attribute {a}"),
        }
    }
}

/// Class predicate AND method predicate.
///
/// ```
/// use suitex::{ClassDescription, Filter, MethodDescription};
///
/// let class = ClassDescription::new("UserTest")
///     .with_capability("Test")
///     .with_method(MethodDescription::new("testLogin"))
///     .with_method(MethodDescription::new("helper"));
///
/// let selected = Filter::test_conventions().select(&class).unwrap();
/// assert_eq!(selected.method_names().collect::<Vec<_>>(), ["testLogin"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    class: Predicate<ClassRule>,
    methods: Predicate<MethodRule>,
}

impl Filter {
    /// A filter from a class rule and an OR-set of method rules. A single
    /// method rule is used as is.
    #[must_use]
    pub fn new(class_rule: ClassRule, method_rules: Vec<MethodRule>) -> Self {
        Self {
            class: Predicate::Rule(class_rule),
            methods: Predicate::any_of(method_rules),
        }
    }

    /// A filter from arbitrary class and method predicates.
    #[must_use]
    pub fn from_predicates(class: Predicate<ClassRule>, methods: Predicate<MethodRule>) -> Self {
        Self { class, methods }
    }

    /// The test convention: classes implementing `Test`; methods named
    /// `test*`, annotated `@test`, or carrying the `Test` attribute.
    #[must_use]
    pub fn test_conventions() -> Self {
        Self::new(
            ClassRule::ImplementsCapability(TEST_CAPABILITY.to_string()),
            vec![
                MethodRule::NamePrefix(TEST_METHOD_PREFIX.to_string()),
                MethodRule::HasDocAnnotation(TEST_DOC_ANNOTATION.to_string()),
                MethodRule::HasAttribute(TEST_ATTRIBUTE.to_string()),
            ],
        )
    }

    /// Returns `true` if the class predicate holds.
    #[must_use]
    pub fn accepts_class(&self, class: &ClassDescription) -> bool {
        self.class.evaluate(class)
    }

    /// Returns `true` if the method predicate holds.
    #[must_use]
    pub fn accepts_method(&self, method: &MethodDescription) -> bool {
        self.methods.evaluate(method)
    }

    /// Apply the filter to a class.
    ///
    /// Returns `None` if the class predicate fails, otherwise the class with
    /// exactly its qualifying methods in declaration order.
    #[must_use]
    pub fn select(&self, class: &ClassDescription) -> Option<TestClass> {
        if !self.accepts_class(class) {
            return None;
        }
        Some(TestClass {
            name: class.name.clone(),
            file: class.file.clone(),
            methods: class
                .methods
                .iter()
                .filter(|m| self.accepts_method(m))
                .cloned()
                .collect(),
        })
    }

    /// Evaluate the filter on a class with a full trace.
    #[must_use]
    pub fn explain(&self, class: &ClassDescription) -> FilterTrace {
        FilterTrace {
            class: class.name.clone(),
            class_trace: self.class.evaluate_with_trace(class),
            methods: class
                .methods
                .iter()
                .map(|m| MethodTrace {
                    name: m.name.clone(),
                    trace: self.methods.evaluate_with_trace(m),
                })
                .collect(),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::test_conventions()
    }
}
