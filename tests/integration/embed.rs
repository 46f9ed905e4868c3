//! `//go:embed` resolution as part of a full listing.

use gosrcs::analyzer::{ListOptions, list_sources, paths};
use gosrcs::core::GosrcsError;
use gosrcs::embed::EmbedErrorKind;
use gosrcs::test_utils::{SourceTree, StaticGraphProvider};

use super::gosrcs_error;

/// A module with one package at the root that embeds `patterns`.
fn embedding_module(tree: &SourceTree, patterns: &[&str]) -> StaticGraphProvider {
    tree.files(&[("go.mod", "module example.com/m\n"), ("main.go", "package main\n")]);
    StaticGraphProvider::new()
        .module("example.com/m", tree.path())
        .package("example.com/m", tree.path(), &["main.go"], &[])
        .embed("example.com/m", patterns)
        .root("example.com/m")
}

fn list(tree: &SourceTree, provider: &StaticGraphProvider) -> anyhow::Result<Vec<String>> {
    list_sources(tree.path(), provider, &ListOptions::default()).map(|files| paths(&files))
}

#[test]
fn test_directory_walk_stops_at_nested_module() {
    let tree = SourceTree::new();
    tree.files(&[
        ("static/index.html", "<html/>"),
        ("static/sub/go.mod", "module example.com/sub\n"),
        ("static/sub/inner.txt", "inner"),
    ]);
    let provider = embedding_module(&tree, &["static"]);

    assert_eq!(list(&tree, &provider).unwrap(), vec!["go.mod", "main.go", "static/index.html"]);
}

#[test]
fn test_direct_match_in_nested_module_fails() {
    let tree = SourceTree::new();
    tree.files(&[("static/sub/go.mod", "module example.com/sub\n"), ("static/sub/inner.txt", "inner")]);
    let provider = embedding_module(&tree, &["static/sub/inner.txt"]);

    let err = list(&tree, &provider).unwrap_err();
    match gosrcs_error(&err) {
        Some(GosrcsError::Embed {
            import_path,
            error,
        }) => {
            assert_eq!(import_path, "example.com/m");
            assert_eq!(error.pattern, "static/sub/inner.txt");
            assert!(matches!(error.kind, EmbedErrorKind::DifferentModule { .. }));
        }
        other => panic!("Expected embed error, got {other:?}"),
    }
    assert!(format!("{err:#}").contains("in different module"));
}

#[test]
fn test_hidden_file_excluded_by_default() {
    let tree = SourceTree::new();
    tree.files(&[("assets/.secret", "s"), ("assets/_draft.txt", "d"), ("assets/public.txt", "p")]);
    let provider = embedding_module(&tree, &["assets"]);

    assert_eq!(list(&tree, &provider).unwrap(), vec!["assets/public.txt", "go.mod", "main.go"]);
}

#[test]
fn test_hidden_file_included_with_all_prefix() {
    let tree = SourceTree::new();
    tree.files(&[("assets/.secret", "s"), ("assets/_draft.txt", "d"), ("assets/public.txt", "p")]);
    let provider = embedding_module(&tree, &["all:assets"]);

    assert_eq!(
        list(&tree, &provider).unwrap(),
        vec!["assets/.secret", "assets/_draft.txt", "assets/public.txt", "go.mod", "main.go"]
    );
}

#[test]
fn test_dot_pattern_is_invalid() {
    let tree = SourceTree::new();
    tree.file("data.txt", "d");
    let provider = embedding_module(&tree, &["."]);

    let err = list(&tree, &provider).unwrap_err();
    match gosrcs_error(&err) {
        Some(GosrcsError::Embed {
            error,
            ..
        }) => {
            assert_eq!(error.pattern, ".");
            assert_eq!(error.kind, EmbedErrorKind::InvalidPatternSyntax);
        }
        other => panic!("Expected embed error, got {other:?}"),
    }
}

#[test]
fn test_unmatched_pattern_names_the_pattern() {
    let tree = SourceTree::new();
    tree.file("data/a.txt", "a");
    let provider = embedding_module(&tree, &["data/*.txt", "missing/*.bin"]);

    let err = list(&tree, &provider).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("pattern missing/*.bin: no matching files found"), "{message}");
}

#[test]
fn test_patterns_overlapping_across_packages() {
    let tree = SourceTree::new();
    tree.files(&[
        ("go.mod", "module example.com/m\n"),
        ("main.go", "package main\n"),
        ("web/web.go", "package web\n"),
        ("web/static/app.js", ""),
        ("web/static/app.css", ""),
    ]);
    let provider = StaticGraphProvider::new()
        .module("example.com/m", tree.path())
        .package("example.com/m", tree.path(), &["main.go"], &["example.com/m/web"])
        .package("example.com/m/web", tree.join("web"), &["web.go"], &[])
        .embed("example.com/m/web", &["static", "static/*.js"])
        .root("example.com/m");

    assert_eq!(
        list(&tree, &provider).unwrap(),
        vec!["go.mod", "main.go", "web/static/app.css", "web/static/app.js", "web/web.go"]
    );
}
