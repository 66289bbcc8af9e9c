//! Structural class descriptions and the introspection boundary.
//!
//! Turning a source file into classes is somebody else's job (a parser, a
//! reflection bridge). This module only fixes the shape of what comes back
//! and the [`ClassIntrospector`] seam the filter is applied through.

use crate::{Filter, RelativePath, SourceFile, SourceFiles};

/// A method as seen by the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodDescription {
    /// Method name.
    pub name: String,
    /// Doc-comment annotation tags, e.g. `@test`, `@dataProvider`.
    pub doc_annotations: Vec<String>,
    /// Language-level attributes, e.g. `Test`, `DataProvider`.
    pub attributes: Vec<String>,
}

impl MethodDescription {
    /// A method with no annotations or attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a doc annotation tag (builder pattern).
    #[must_use]
    pub fn with_doc_annotation(mut self, tag: impl Into<String>) -> Self {
        self.doc_annotations.push(tag.into());
        self
    }

    /// Add an attribute (builder pattern).
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }
}

/// A class as seen by the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDescription {
    /// Simple (unqualified) class name.
    pub name: String,
    /// File the class was found in, when known.
    pub file: Option<RelativePath>,
    /// Every capability/interface the class declares or inherits.
    pub capabilities: Vec<String>,
    /// Methods in declaration order.
    pub methods: Vec<MethodDescription>,
}

impl ClassDescription {
    /// A class with no capabilities and no methods.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the file the class lives in (builder pattern).
    #[must_use]
    pub fn in_file(mut self, path: impl Into<RelativePath>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Add a capability (builder pattern).
    #[must_use]
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// Add a method (builder pattern).
    #[must_use]
    pub fn with_method(mut self, method: MethodDescription) -> Self {
        self.methods.push(method);
        self
    }
}

/// A class the filter selected, with only its qualifying methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestClass {
    /// Simple class name.
    pub name: String,
    /// File the class was found in, when known.
    pub file: Option<RelativePath>,
    /// Qualifying methods, in declaration order. May be empty.
    pub methods: Vec<MethodDescription>,
}

impl TestClass {
    /// Names of the selected methods, in order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.methods.iter().map(|m| m.name.as_str())
    }
}

/// Failure to describe the classes of a file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntrospectError {
    /// The file could not be read.
    #[error("cannot read \"{path}\": {reason}")]
    Unreadable {
        /// File being introspected.
        path: RelativePath,
        /// Underlying error message.
        reason: String,
    },
    /// The file could not be understood.
    #[error("cannot describe classes in \"{path}\": {reason}")]
    Malformed {
        /// File being introspected.
        path: RelativePath,
        /// Underlying error message.
        reason: String,
    },
}

/// Describes the classes declared in source files.
///
/// Implementors provide [`describe`](Self::describe); the default
/// [`classes_in`](Self::classes_in) applies a [`Filter`] to every class of
/// every file, in file order then declaration order.
pub trait ClassIntrospector {
    /// Every class declared in `file`, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`IntrospectError`] if the file cannot be read or understood.
    fn describe(&self, file: &SourceFile) -> Result<Vec<ClassDescription>, IntrospectError>;

    /// The test classes of `files` according to `filter`.
    ///
    /// # Errors
    ///
    /// Propagates the first [`IntrospectError`]; no partial result.
    fn classes_in(
        &self,
        files: &SourceFiles,
        filter: &Filter,
    ) -> Result<Vec<TestClass>, IntrospectError> {
        let mut selected = Vec::new();
        for file in files {
            for class in self.describe(file)? {
                if let Some(test_class) = filter.select(&class) {
                    selected.push(test_class);
                }
            }
        }
        Ok(selected)
    }
}
