//! `FileConstraint` — predicates over candidate file names
//!
//! A directory declaration narrows its scan with an optional prefix and an
//! optional suffix. Both are matched against the file name (the last path
//! component), never against the directory part.
//!
//! # Variants
//!
//! - [`FileConstraint::None`] — always matches
//! - [`FileConstraint::Prefix`] — file name starts with the prefix
//! - [`FileConstraint::Suffix`] — file name ends with the suffix
//! - [`FileConstraint::All`] — every child matches (`All([])` matches everything)

use std::fmt;

/// Predicate over a file name.
///
/// ```
/// use suitex::FileConstraint;
///
/// let c = FileConstraint::from_affixes("", "Test.php");
/// assert!(c.matches("UserTest.php"));
/// assert!(!c.matches("User.php"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FileConstraint {
    /// No constraint.
    #[default]
    None,
    /// File name starts with this prefix.
    Prefix(String),
    /// File name ends with this suffix.
    Suffix(String),
    /// All children must match.
    All(Vec<FileConstraint>),
}

impl FileConstraint {
    /// Check a file name against this constraint.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            Self::None => true,
            Self::Prefix(p) => file_name.starts_with(p.as_str()),
            Self::Suffix(s) => file_name.ends_with(s.as_str()),
            Self::All(cs) => cs.iter().all(|c| c.matches(file_name)),
        }
    }

    /// Build the constraint for a directory declaration.
    ///
    /// Empty affixes are omitted:
    ///
    /// - neither → [`None`](Self::None)
    /// - one → that constraint, unwrapped
    /// - both → `All([Prefix, Suffix])`
    #[must_use]
    pub fn from_affixes(prefix: &str, suffix: &str) -> Self {
        let mut constraints = Vec::with_capacity(2);
        if !prefix.is_empty() {
            constraints.push(Self::Prefix(prefix.to_string()));
        }
        if !suffix.is_empty() {
            constraints.push(Self::Suffix(suffix.to_string()));
        }
        Self::from_all(constraints)
    }

    /// Compose constraints with AND semantics.
    ///
    /// Empty becomes [`None`](Self::None), a single constraint is returned
    /// unwrapped, more become [`All`](Self::All).
    #[must_use]
    pub fn from_all(mut constraints: Vec<Self>) -> Self {
        match constraints.len() {
            0 => Self::None,
            1 => constraints.pop().unwrap_or_default(),
            _ => Self::All(constraints),
        }
    }

    /// Returns `true` if this constraint accepts every file name.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        match self {
            Self::None => true,
            Self::All(cs) => cs.iter().all(Self::is_unconstrained),
            Self::Prefix(_) | Self::Suffix(_) => false,
        }
    }
}

impl fmt::Display for FileConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("*"),
            Self::Prefix(p) => write!(f, "{p}*"),
            Self::Suffix(s) => write!(f, "*{s}"),
            Self::All(cs) => {
                f.write_str("all(")?;
                for (i, c) in cs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str(")")
            }
        }
    }
}
