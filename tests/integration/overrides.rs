//! Local `replace` directives.

use gosrcs::analyzer::{ListOptions, list_sources, paths};
use gosrcs::core::GosrcsError;
use gosrcs::test_utils::{SourceTree, StaticGraphProvider};

use super::gosrcs_error;

/// `a` replaces `b` and `c` with sibling directories; `b` imports `c`.
fn sibling_modules() -> SourceTree {
    let tree = SourceTree::new();
    tree.files(&[
        ("a/go.mod", "module a\n\nrequire (\n\tb v0.0.0\n\tc v0.0.0\n)\n\nreplace b => ../b\n\nreplace c => ../c\n"),
        ("a/go.sum", ""),
        ("a/main.go", "package main\n"),
        ("b/go.mod", "module b\n\nrequire c v0.0.0\n"),
        ("b/b.go", "package b\n"),
        ("c/go.mod", "module c\n"),
        ("c/go.sum", ""),
        ("c/c.go", "package c\n"),
    ]);
    tree
}

#[test]
fn test_override_applies_transitively() {
    let tree = sibling_modules();
    let provider = StaticGraphProvider::new()
        .module("a", tree.join("a"))
        .module("b", tree.join("b"))
        .module("c", tree.join("c"))
        .package("a", tree.join("a"), &["main.go"], &["b"])
        .package("b", tree.join("b"), &["b.go"], &["c"])
        .package("c", tree.join("c"), &["c.go"], &[])
        .root("a");

    let files = list_sources(&tree.join("a"), &provider, &ListOptions::default()).unwrap();
    assert_eq!(
        paths(&files),
        vec!["../b/b.go", "../b/go.mod", "../c/c.go", "../c/go.mod", "../c/go.sum", "go.mod", "go.sum", "main.go"]
    );
}

#[test]
fn test_base_dir_above_all_units() {
    let tree = sibling_modules();
    let provider = StaticGraphProvider::new()
        .module("a", tree.join("a"))
        .module("b", tree.join("b"))
        .package("a", tree.join("a"), &["main.go"], &["b"])
        .package("b", tree.join("b"), &["b.go"], &[])
        .root("a");

    let options = ListOptions {
        base_dir: Some(tree.path().to_path_buf()),
        ..ListOptions::default()
    };
    let files = list_sources(&tree.join("a"), &provider, &options).unwrap();
    assert_eq!(paths(&files), vec!["a/go.mod", "a/go.sum", "a/main.go", "b/b.go", "b/go.mod"]);
}

#[test]
fn test_overridden_unit_importing_back_into_entry_unit() {
    let tree = sibling_modules();
    tree.file("a/util/util.go", "package util\n");
    let provider = StaticGraphProvider::new()
        .module("a", tree.join("a"))
        .module("b", tree.join("b"))
        .package("a", tree.join("a"), &["main.go"], &["b"])
        .package("a/util", tree.join("a/util"), &["util.go"], &[])
        .package("b", tree.join("b"), &["b.go"], &["a/util"])
        .root("a");

    let files = list_sources(&tree.join("a"), &provider, &ListOptions::default()).unwrap();
    assert!(paths(&files).contains(&"util/util.go".to_string()));
}

#[test]
fn test_versioned_and_absolute_replacements_are_not_local() {
    let tree = SourceTree::new();
    tree.files(&[
        (
            "app/go.mod",
            "module app\n\nreplace pinned => ../pinned v1.0.0\n\nreplace remote v1.0.0 => example.com/fork v1.1.0\n",
        ),
        ("app/main.go", "package main\n"),
        ("pinned/go.mod", "module pinned\n"),
        ("pinned/p.go", "package pinned\n"),
    ]);
    let provider = StaticGraphProvider::new()
        .module("app", tree.join("app"))
        .module("pinned", tree.join("pinned"))
        .module("remote", "/gopath/pkg/mod/example.com/fork@v1.1.0")
        .package("app", tree.join("app"), &["main.go"], &["pinned", "remote"])
        .package("pinned", tree.join("pinned"), &["p.go"], &[])
        .package("remote", "/gopath/pkg/mod/example.com/fork@v1.1.0", &["r.go"], &[])
        .root("app");

    let files = list_sources(&tree.join("app"), &provider, &ListOptions::default()).unwrap();
    assert_eq!(paths(&files), vec!["go.mod", "main.go"]);
}

#[test]
fn test_cyclic_imports_across_units_terminate() {
    let tree = sibling_modules();
    let provider = StaticGraphProvider::new()
        .module("a", tree.join("a"))
        .module("b", tree.join("b"))
        .module("c", tree.join("c"))
        .package("a", tree.join("a"), &["main.go"], &["b", "c"])
        .package("b", tree.join("b"), &["b.go"], &["c"])
        .package("c", tree.join("c"), &["c.go"], &["b"])
        .root("a");

    let files = list_sources(&tree.join("a"), &provider, &ListOptions::default()).unwrap();
    assert_eq!(files.len(), 8);
}

#[test]
fn test_override_without_manifest_fails() {
    let tree = SourceTree::new();
    tree.files(&[
        ("a/go.mod", "module a\nreplace b => ../b\n"),
        ("a/main.go", "package main\n"),
        ("b/b.go", "package b\n"),
    ]);
    let provider = StaticGraphProvider::new()
        .module("a", tree.join("a"))
        .module("b", tree.join("b"))
        .package("a", tree.join("a"), &["main.go"], &["b"])
        .package("b", tree.join("b"), &["b.go"], &[])
        .root("a");

    let err = list_sources(&tree.join("a"), &provider, &ListOptions::default()).unwrap_err();
    assert!(matches!(gosrcs_error(&err), Some(GosrcsError::ManifestReadError { .. })));
}
