//! A module whose `app` package imports `lib` and embeds `data/*.txt`.

use gosrcs::analyzer::{ListOptions, list_sources, paths};
use gosrcs::test_utils::{SourceTree, StaticGraphProvider, init_test_logging};

fn scenario_tree() -> SourceTree {
    let tree = SourceTree::new();
    tree.files(&[
        ("go.mod", "module example.com/m\n\ngo 1.22\n"),
        ("go.sum", ""),
        ("app/app.go", "package main\n\n//go:embed data/*.txt\nvar data embed.FS\n"),
        ("app/data/x.txt", "x"),
        ("app/data/y.txt", "y"),
        ("app/data/z.json", "{}"),
        ("lib/a.go", "package lib\n"),
        ("lib/b.go", "package lib\n"),
        ("unused/u.go", "package unused\n"),
    ]);
    tree
}

fn scenario_provider(tree: &SourceTree) -> StaticGraphProvider {
    StaticGraphProvider::new()
        .module("example.com/m", tree.path())
        .package("example.com/m/app", tree.join("app"), &["app.go"], &["embed", "example.com/m/lib"])
        .embed("example.com/m/app", &["data/*.txt"])
        .package("example.com/m/lib", tree.join("lib"), &["a.go", "b.go"], &[])
        .package("example.com/m/unused", tree.join("unused"), &["u.go"], &[])
        .std_package("embed")
        .root("example.com/m/app")
}

#[test]
fn test_app_with_library_and_embedded_data() {
    init_test_logging(None);
    let tree = scenario_tree();
    let provider = scenario_provider(&tree);

    let files = list_sources(&tree.join("app"), &provider, &ListOptions::default()).unwrap();
    assert_eq!(
        paths(&files),
        vec!["app/app.go", "app/data/x.txt", "app/data/y.txt", "go.mod", "go.sum", "lib/a.go", "lib/b.go"]
    );
}

#[test]
fn test_owning_import_paths() {
    let tree = scenario_tree();
    let provider = scenario_provider(&tree);

    let files = list_sources(&tree.join("app"), &provider, &ListOptions::default()).unwrap();
    for file in &files {
        let expected = match file.path.as_str() {
            "go.mod" | "go.sum" => "",
            p if p.starts_with("app/") => "example.com/m/app",
            p if p.starts_with("lib/") => "example.com/m/lib",
            other => panic!("unexpected file {other}"),
        };
        assert_eq!(file.import_path, expected, "owner of {}", file.path);
    }
}

#[test]
fn test_package_dir_below_module_root() {
    let tree = scenario_tree();
    let provider = scenario_provider(&tree);

    // The manifest is found by walking up from a nested directory.
    list_sources(&tree.join("app/data"), &provider, &ListOptions::default()).unwrap();
    let request = provider.last_request().unwrap();
    assert_eq!(request.manifest_dir, tree.path());
}

#[test]
fn test_missing_checksum_file_is_not_listed() {
    let tree = SourceTree::new();
    tree.files(&[("go.mod", "module example.com/m\n"), ("main.go", "package main\n")]);
    let provider = StaticGraphProvider::new()
        .module("example.com/m", tree.path())
        .package("example.com/m", tree.path(), &["main.go"], &[])
        .root("example.com/m");

    let files = list_sources(tree.path(), &provider, &ListOptions::default()).unwrap();
    assert_eq!(paths(&files), vec!["go.mod", "main.go"]);
}

#[test]
fn test_auxiliary_files_are_listed() {
    let tree = SourceTree::new();
    tree.files(&[
        ("go.mod", "module example.com/m\n"),
        ("main.go", "package main\n"),
        ("impl.c", ""),
        ("impl.h", ""),
        ("asm_amd64.s", ""),
    ]);
    let provider = StaticGraphProvider::new()
        .module("example.com/m", tree.path())
        .package("example.com/m", tree.path(), &["main.go"], &[])
        .other_files("example.com/m", &["impl.c", "impl.h", "asm_amd64.s"])
        .root("example.com/m");

    let files = list_sources(tree.path(), &provider, &ListOptions::default()).unwrap();
    assert_eq!(paths(&files), vec!["asm_amd64.s", "go.mod", "impl.c", "impl.h", "main.go"]);
}
