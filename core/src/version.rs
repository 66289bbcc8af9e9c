//! Platform version gating.
//!
//! Directory and file declarations may carry a version constraint such as
//! `phpVersion="8.0.0" phpVersionOperator=">="`. The gate compares the running
//! platform version against it.
//!
//! Versions are compared numerically, component by component. Missing
//! components count as zero, so `8.0` and `8.0.0` are equal. A component that
//! does not start with a digit also counts as zero; a component with trailing
//! text (`0RC1`) uses its leading digits.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A dot-separated numeric version.
///
/// ```
/// use suitex::Version;
///
/// let a: Version = "8.1".parse().unwrap();
/// let b: Version = "8.1.0".parse().unwrap();
/// assert_eq!(a, b);
/// assert!(a < "8.10".parse().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    components: Vec<u64>,
}

impl Version {
    /// Parse a version. Never fails: unparseable components become zero.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let components = raw.trim().split('.').map(leading_number).collect();
        Self { raw, components }
    }

    /// The version as it was written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

fn leading_number(component: &str) -> u64 {
    component
        .trim()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, b| acc.saturating_mul(10).saturating_add(u64::from(b - b'0')))
}

impl FromStr for Version {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

/// Comparison operator of a version constraint.
///
/// Parses both the symbolic and the word spelling (`>=` and `ge`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VersionOperator {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    #[default]
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl VersionOperator {
    /// Symbolic spelling of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }

    /// Apply the operator to `lhs OP rhs`.
    #[must_use]
    pub fn compare(self, lhs: &Version, rhs: &Version) -> bool {
        let ord = lhs.cmp(rhs);
        match self {
            Self::Lt => ord.is_lt(),
            Self::Le => ord.is_le(),
            Self::Gt => ord.is_gt(),
            Self::Ge => ord.is_ge(),
            Self::Eq => ord.is_eq(),
            Self::Ne => ord.is_ne(),
        }
    }
}

/// Error for an operator spelling that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown version operator \"{0}\" (expected one of <, <=, >, >=, ==, !=)")]
pub struct UnknownOperator(pub String);

impl FromStr for VersionOperator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" | "lt" => Ok(Self::Lt),
            "<=" | "le" => Ok(Self::Le),
            ">" | "gt" => Ok(Self::Gt),
            ">=" | "ge" => Ok(Self::Ge),
            "==" | "=" | "eq" => Ok(Self::Eq),
            "!=" | "<>" | "ne" => Ok(Self::Ne),
            other => Err(UnknownOperator(other.to_string())),
        }
    }
}

impl TryFrom<String> for VersionOperator {
    type Error = UnknownOperator;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VersionOperator> for String {
    fn from(op: VersionOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for VersionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared version constraint. An empty `version` means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionConstraint {
    /// Declared version, `""` when the declaration has none.
    ///
    /// Also read from a bare number (`version: 8.0` in YAML). A float keeps
    /// no trailing zeros, so `8.10` unquoted is `8.1`.
    #[serde(default, deserialize_with = "version_string")]
    pub version: String,
    /// Operator applied as `platform OP version`.
    #[serde(default)]
    pub operator: VersionOperator,
}

impl VersionConstraint {
    /// Create a constraint.
    pub fn new(version: impl Into<String>, operator: VersionOperator) -> Self {
        Self {
            version: version.into(),
            operator,
        }
    }

    /// A constraint that every platform satisfies.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Returns `true` when no version was declared.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.version.trim().is_empty()
    }
}

fn version_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct VersionVisitor;

    impl serde::de::Visitor<'_> for VersionVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a version string or number")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: serde::de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(VersionVisitor)
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unconstrained() {
            f.write_str("*")
        } else {
            write!(f, "{} {}", self.operator, self.version)
        }
    }
}

/// Compares declared constraints against the running platform version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGate {
    platform: Version,
}

impl VersionGate {
    /// Gate for the given running platform version.
    pub fn new(platform: impl Into<Version>) -> Self {
        Self {
            platform: platform.into(),
        }
    }

    /// The running platform version.
    #[must_use]
    pub fn platform(&self) -> &Version {
        &self.platform
    }

    /// `platform OP declared`. An empty declared version always passes.
    #[must_use]
    pub fn satisfied(&self, declared: &str, operator: VersionOperator) -> bool {
        if declared.trim().is_empty() {
            return true;
        }
        operator.compare(&self.platform, &Version::new(declared))
    }

    /// Same as [`satisfied`](Self::satisfied) for a constraint value.
    #[must_use]
    pub fn allows(&self, constraint: &VersionConstraint) -> bool {
        self.satisfied(&constraint.version, constraint.operator)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
