//! `phpunit.xml` loading.
//!
//! Reads the `<testsuites>` section of a PHPUnit configuration:
//!
//! ```xml
//! <phpunit>
//!   <testsuites>
//!     <testsuite name="unit">
//!       <directory suffix="Test.php" phpVersion="8.0.0" phpVersionOperator=">=">tests/Unit</directory>
//!       <file phpVersion="8.1">tests/Legacy/OldTest.php</file>
//!       <exclude>tests/Unit/Fixtures</exclude>
//!     </testsuite>
//!   </testsuites>
//! </phpunit>
//! ```
//!
//! PHPUnit's own defaults apply: a `<directory>` without a `suffix` attribute
//! only matches `Test.php` files, and a missing `phpVersionOperator` is `>=`.
//! Everything outside `<testsuites>` is ignored.
//!
//! Relative paths are relative to the directory holding the configuration
//! file, so a config in `ci/` can point at `../tests`.

use crate::config::read_config;
use crate::{
    ConfigLoader, DirectoryDeclaration, ExcludeDeclaration, FileDeclaration, SuiteConfiguration,
    SuiteDeclaration, SuiteError, VersionConstraint, VersionOperator,
};
use roxmltree::{Document, Node};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration file looked up when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "phpunit.xml";

/// Fallback when [`DEFAULT_CONFIG_FILE`] does not exist.
pub const DIST_CONFIG_FILE: &str = "phpunit.xml.dist";

/// Suffix PHPUnit applies to a `<directory>` without a `suffix` attribute.
pub const DEFAULT_DIRECTORY_SUFFIX: &str = "Test.php";

/// The configuration file to load for a project.
///
/// An explicit `config_file` is resolved against `root` (or taken as is when
/// absolute). Otherwise `phpunit.xml`, then `phpunit.xml.dist`; if neither
/// exists the `phpunit.xml` path is returned so loading reports it missing.
#[must_use]
pub fn locate_config(root: &Path, config_file: Option<&Path>) -> PathBuf {
    if let Some(file) = config_file {
        return root.join(file);
    }
    let primary = root.join(DEFAULT_CONFIG_FILE);
    if primary.is_file() {
        return primary;
    }
    let dist = root.join(DIST_CONFIG_FILE);
    if dist.is_file() {
        debug!(path = %dist.display(), "using dist configuration");
        return dist;
    }
    primary
}

/// [`ConfigLoader`] for PHPUnit XML configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpUnitConfigLoader;

impl PhpUnitConfigLoader {
    /// Parse PHPUnit XML already read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::ConfigMalformed`] for invalid XML, a root element
    /// other than `<phpunit>`, a `<testsuite>` without a name or an unknown
    /// `phpVersionOperator`.
    pub fn parse(&self, path: &Path, content: &str) -> Result<SuiteConfiguration, SuiteError> {
        let malformed = |reason: String| SuiteError::ConfigMalformed {
            path: path.to_path_buf(),
            reason,
        };

        let doc = Document::parse(content).map_err(|e| malformed(format!("XML parse error: {e}")))?;
        let root = doc.root_element();
        if !root.has_tag_name("phpunit") {
            return Err(malformed(format!(
                "expected <phpunit> root element, found <{}>",
                root.tag_name().name()
            )));
        }

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let mut suites = Vec::new();
        for testsuites in children(root, "testsuites") {
            for testsuite in children(testsuites, "testsuite") {
                suites.push(parse_suite(testsuite, base).map_err(&malformed)?);
            }
        }

        debug!(path = %path.display(), suites = suites.len(), "loaded phpunit configuration");
        Ok(SuiteConfiguration { suites })
    }
}

impl ConfigLoader for PhpUnitConfigLoader {
    fn load(&self, path: &Path) -> Result<SuiteConfiguration, SuiteError> {
        let content = read_config(path)?;
        self.parse(path, &content)
    }
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| n.has_tag_name(tag))
}

fn parse_suite(node: Node<'_, '_>, base: &Path) -> Result<SuiteDeclaration, String> {
    let name = node
        .attribute("name")
        .ok_or_else(|| format!("<testsuite> at {} has no name", position(node)))?;
    let mut suite = SuiteDeclaration::new(name);

    for child in node.children().filter(Node::is_element) {
        let Some(path) = text(child) else {
            warn!(suite = %name, element = child.tag_name().name(), "ignoring empty element");
            continue;
        };
        let path = rebase(base, path);
        match child.tag_name().name() {
            "directory" => suite.directories.push(DirectoryDeclaration {
                path,
                prefix: child.attribute("prefix").unwrap_or_default().to_string(),
                suffix: child
                    .attribute("suffix")
                    .unwrap_or(DEFAULT_DIRECTORY_SUFFIX)
                    .to_string(),
                version: version_constraint(child)?,
            }),
            "file" => suite.files.push(FileDeclaration {
                path,
                version: version_constraint(child)?,
            }),
            "exclude" => suite.exclude.push(ExcludeDeclaration { path }),
            other => debug!(suite = %name, element = other, "ignoring unknown element"),
        }
    }
    Ok(suite)
}

fn text(node: Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// `path` relative to `base`, or unchanged when absolute or `base` is empty.
fn rebase(base: &Path, path: String) -> String {
    if base.as_os_str().is_empty() || Path::new(&path).is_absolute() {
        return path;
    }
    base.join(path).to_string_lossy().into_owned()
}

fn version_constraint(node: Node<'_, '_>) -> Result<VersionConstraint, String> {
    let version = node.attribute("phpVersion").unwrap_or_default().trim();
    let operator = match node.attribute("phpVersionOperator") {
        Some(op) => op.parse::<VersionOperator>().map_err(|e| {
            format!("<{}> at {}: {e}", node.tag_name().name(), position(node))
        })?,
        None => VersionOperator::default(),
    };
    Ok(VersionConstraint::new(version, operator))
}

fn position(node: Node<'_, '_>) -> String {
    let pos = node.document().text_pos_at(node.range().start);
    format!("{}:{}", pos.row, pos.col)
}
