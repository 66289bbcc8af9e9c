//! End-to-end resolution of a PHPUnit project.
//!
//! The same project is resolved twice: from disk through `ProjectFiles`, and
//! in memory through `FakeProject`. Both must agree.

use std::fs;
use std::path::Path;
use suitex::{PhpUnitConfigLoader, SuiteError, TestSuiteConfig, TestSuitesConfig};
use suitex_test::prelude::*;

const PHPUNIT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<phpunit xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" bootstrap="vendor/autoload.php">
    <testsuites>
        <testsuite name="fake">
            <directory>tests/All</directory>
            <directory prefix="Matching" phpVersion="8.0.0" phpVersionOperator=">=">tests/MorePhp800gt</directory>
            <directory prefix="Matching" phpVersion="8.0.0" phpVersionOperator="&lt;">tests/LessPhp800lt</directory>
            <file>tests/Alone/AloneTest.php</file>
            <file phpVersion="8.0.0" phpVersionOperator=">=">tests/Alone/AloneMorePhp800gtTest.php</file>
            <file phpVersion="8.0.0" phpVersionOperator="&lt;">tests/Alone/AloneLessPhp800ltTest.php</file>
            <file>tests/Random/NotATest.php</file>
            <exclude>tests/All/Exclude</exclude>
        </testsuite>
    </testsuites>
</phpunit>
"#;

const PROJECT_FILES: [&str; 11] = [
    "tests/All/AllMatchingTest.php",
    "tests/All/Random.php",
    "tests/All/Exclude/ExcludeTest.php",
    "tests/Alone/AloneTest.php",
    "tests/Alone/AloneMorePhp800gtTest.php",
    "tests/Alone/AloneLessPhp800ltTest.php",
    "tests/MorePhp800gt/MatchingTest.php",
    "tests/MorePhp800gt/NotMatchingTest.php",
    "tests/LessPhp800lt/MatchingTest.php",
    "tests/LessPhp800lt/NotMatchingTest.php",
    "tests/Random/NotATest.php",
];

fn project_on_disk(config_name: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in PROJECT_FILES {
        let path = dir.path().join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<?php\n").unwrap();
    }
    fs::write(dir.path().join(config_name), PHPUNIT_XML).unwrap();
    dir
}

fn resolve_on_disk(root: &Path, platform: &str) -> TestSuitesConfig {
    ResolverBuilder::for_project(ProjectFiles::new(root), platform)
        .using_phpunit()
        .build()
        .unwrap()
        .resolve()
        .unwrap()
}

fn resolve_in_memory(platform: &str) -> TestSuitesConfig {
    let configuration = PhpUnitConfigLoader
        .parse(Path::new("phpunit.xml"), PHPUNIT_XML)
        .unwrap();
    ResolverBuilder::for_project(FakeProject::from_paths(PROJECT_FILES), platform)
        .using_configuration(configuration, Filter::test_conventions())
        .build()
        .unwrap()
        .resolve()
        .unwrap()
}

fn only_suite(suites: &TestSuitesConfig) -> &TestSuiteConfig {
    assert_eq!(suites.len(), 1);
    let iterated = suites.iter().last().unwrap();
    assert_eq!(&suites[0], iterated);
    iterated
}

fn paths(suite: &TestSuiteConfig) -> Vec<&str> {
    suite.source.paths().collect()
}

#[test]
fn resolves_fake_project_on_a_newer_platform() {
    let dir = project_on_disk("phpunit.xml");
    let suites = resolve_on_disk(dir.path(), "8.2.12");
    let suite = only_suite(&suites);

    assert_eq!(suite.name, "fake");
    assert_eq!(
        paths(suite),
        [
            "tests/All/AllMatchingTest.php",
            "tests/MorePhp800gt/MatchingTest.php",
            "tests/Alone/AloneTest.php",
            "tests/Alone/AloneMorePhp800gtTest.php",
            "tests/Random/NotATest.php",
        ]
    );
}

#[test]
fn resolves_fake_project_on_an_older_platform() {
    let dir = project_on_disk("phpunit.xml");
    let suites = resolve_on_disk(dir.path(), "7.4.33");

    assert_eq!(
        paths(only_suite(&suites)),
        [
            "tests/All/AllMatchingTest.php",
            "tests/LessPhp800lt/MatchingTest.php",
            "tests/Alone/AloneTest.php",
            "tests/Alone/AloneLessPhp800ltTest.php",
            "tests/Random/NotATest.php",
        ]
    );
}

#[test]
fn disk_and_memory_agree() {
    let dir = project_on_disk("phpunit.xml");
    for platform in ["7.4.33", "8.0.0", "8.3.1"] {
        assert_eq!(
            resolve_on_disk(dir.path(), platform),
            resolve_in_memory(platform),
            "platform {platform}"
        );
    }
}

#[test]
fn dist_configuration_is_picked_up() {
    let dir = project_on_disk("phpunit.xml.dist");
    let suites = resolve_on_disk(dir.path(), "8.2.12");
    assert_eq!(only_suite(&suites).source.len(), 5);
}

#[test]
fn resolving_twice_is_stable() {
    let dir = project_on_disk("phpunit.xml");
    let resolver = ResolverBuilder::for_project(ProjectFiles::new(dir.path()), "8.2.12")
        .using_phpunit()
        .build()
        .unwrap();
    assert_eq!(resolver.resolve().unwrap(), resolver.resolve().unwrap());
}

#[test]
fn no_strategy_is_a_configuration_error() {
    let result = ResolverBuilder::for_project(fake_project(), "8.2.12").build();
    assert!(matches!(result, Err(SuiteError::Configuration)));
}

#[test]
fn missing_configuration_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = ResolverBuilder::for_project(ProjectFiles::new(dir.path()), "8.2.12")
        .using_phpunit()
        .build()
        .unwrap()
        .resolve()
        .unwrap_err();
    match err {
        SuiteError::ConfigNotFound { path } => assert!(path.ends_with("phpunit.xml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn filesystem_failure_aborts_resolution() {
    let configuration = PhpUnitConfigLoader
        .parse(Path::new("phpunit.xml"), PHPUNIT_XML)
        .unwrap();
    let project = FakeProject::from_paths(PROJECT_FILES).unreadable("tests/Alone");
    let err = ResolverBuilder::for_project(project, "8.2.12")
        .using_configuration(configuration, Filter::test_conventions())
        .build()
        .unwrap()
        .resolve()
        .unwrap_err();
    match err {
        SuiteError::Resolution { suite, path, .. } => {
            assert_eq!(suite, "fake");
            assert!(path.ends_with("tests/Alone/AloneTest.php"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn filter_selects_test_classes_and_methods() {
    let introspector = FakeIntrospector::new()
        .with_class(
            "tests/All/AllMatchingTest.php",
            ClassDescription::new("AllMatchingTest")
                .with_capability("Test")
                .with_method(MethodDescription::new("testPrefixed"))
                .with_method(MethodDescription::new("annotated").with_doc_annotation("@test"))
                .with_method(MethodDescription::new("helper")),
        )
        .with_class(
            "tests/MorePhp800gt/MatchingTest.php",
            ClassDescription::new("MatchingTest").with_capability("Test"),
        )
        .with_class(
            "tests/Alone/AloneTest.php",
            ClassDescription::new("AloneTest").with_capability("Test"),
        )
        .with_class(
            "tests/Alone/AloneMorePhp800gtTest.php",
            ClassDescription::new("AloneMorePhp800gtTest").with_capability("Test"),
        )
        .with_class(
            "tests/Random/NotATest.php",
            ClassDescription::new("NotATest")
                .with_method(MethodDescription::new("testNothing")),
        );

    let suites = resolve_in_memory("8.2.12");
    let suite = only_suite(&suites);
    let classes = introspector.classes_in(&suite.source, &suite.filter).unwrap();

    let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        ["AllMatchingTest", "MatchingTest", "AloneTest", "AloneMorePhp800gtTest"]
    );
    for class in &classes {
        let methods: Vec<_> = class.method_names().collect();
        if class.name == "AllMatchingTest" {
            assert_eq!(methods, ["testPrefixed", "annotated"]);
        } else {
            assert!(methods.is_empty(), "{} has {methods:?}", class.name);
        }
    }
}

#[test]
fn explicit_empty_suffix_matches_every_file() {
    let xml = r#"<phpunit><testsuites><testsuite name="fake">
        <directory suffix="">tests/All</directory>
        <exclude>tests/All/Exclude/ExcludeTest.php</exclude>
        <file>tests/Random/NotATest.php</file>
    </testsuite></testsuites></phpunit>"#;
    let configuration = PhpUnitConfigLoader.parse(Path::new("phpunit.xml"), xml).unwrap();

    let suites = ResolverBuilder::for_project(fake_project(), "8.2.12")
        .using_configuration(configuration, Filter::test_conventions())
        .build()
        .unwrap()
        .resolve()
        .unwrap();

    assert_eq!(
        paths(only_suite(&suites)),
        [
            "tests/All/AllMatchingTest.php",
            "tests/All/Random.php",
            "tests/Random/NotATest.php",
        ]
    );
}
