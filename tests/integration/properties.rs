//! Properties that hold for every listing.

use std::collections::HashSet;

use gosrcs::analyzer::{ListOptions, list_sources, paths};
use gosrcs::test_utils::{SourceTree, StaticGraphProvider};

/// A diamond (`app` -> `left`, `right` -> `base`) with an external dependency
/// and standard library imports.
fn diamond() -> (SourceTree, StaticGraphProvider) {
    let tree = SourceTree::new();
    tree.files(&[
        ("go.mod", "module m\n\nrequire example.com/ext v1.2.3\n"),
        ("go.sum", "example.com/ext v1.2.3 h1:abc=\n"),
        ("app/main.go", "package main\n"),
        ("left/left.go", "package left\n"),
        ("right/right.go", "package right\n"),
        ("base/base.go", "package base\n"),
        ("base/data/seed.json", "{}"),
    ]);
    let provider = StaticGraphProvider::new()
        .module("m", tree.path())
        .module("example.com/ext", "/gopath/pkg/mod/example.com/ext@v1.2.3")
        .package("m/app", tree.join("app"), &["main.go"], &["m/left", "m/right", "fmt"])
        .package("m/left", tree.join("left"), &["left.go"], &["m/base", "example.com/ext"])
        .package("m/right", tree.join("right"), &["right.go"], &["m/base", "os"])
        .package("m/base", tree.join("base"), &["base.go"], &["strings"])
        .embed("m/base", &["data"])
        .package("example.com/ext", "/gopath/pkg/mod/example.com/ext@v1.2.3", &["ext.go"], &["fmt"])
        .std_package("fmt")
        .std_package("os")
        .std_package("strings")
        .root("m/app");
    (tree, provider)
}

const EXPECTED: &[&str] = &[
    "app/main.go",
    "base/base.go",
    "base/data/seed.json",
    "go.mod",
    "go.sum",
    "left/left.go",
    "right/right.go",
];

#[test]
fn test_listing_is_deterministic() {
    let (tree, provider) = diamond();
    let first = list_sources(&tree.join("app"), &provider, &ListOptions::default()).unwrap();
    let second = list_sources(&tree.join("app"), &provider, &ListOptions::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(paths(&first), EXPECTED);
}

#[test]
fn test_import_order_does_not_matter() {
    let (tree, provider) = diamond();
    let forward = list_sources(&tree.join("app"), &provider, &ListOptions::default()).unwrap();

    let provider = provider.reversed_imports();
    let reversed = list_sources(&tree.join("app"), &provider, &ListOptions::default()).unwrap();
    assert_eq!(paths(&forward), paths(&reversed));
}

#[test]
fn test_no_duplicate_paths() {
    let (tree, provider) = diamond();
    let files = list_sources(&tree.join("app"), &provider, &ListOptions::default()).unwrap();
    let unique: HashSet<_> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(unique.len(), files.len());

    let mut sorted = paths(&files);
    sorted.sort();
    assert_eq!(paths(&files), sorted);
}

#[test]
fn test_external_and_standard_packages_contribute_nothing() {
    let (tree, provider) = diamond();
    let files = list_sources(&tree.join("app"), &provider, &ListOptions::default()).unwrap();
    assert!(files.iter().all(|f| !f.path.contains("ext") && !f.path.starts_with("..")));
    assert!(files.iter().all(|f| f.import_path.is_empty() || f.import_path.starts_with("m/")));
}

#[test]
fn test_only_the_requested_package_closure_is_listed() {
    let (tree, provider) = diamond();
    let provider = provider.package("m/tool", tree.join("tool"), &["tool.go"], &["m/app"]);
    let files = list_sources(&tree.join("app"), &provider, &ListOptions::default()).unwrap();
    assert_eq!(paths(&files), EXPECTED);
}
