//! Path mapping tests, pure and against a project on disk

use std::sync::Arc;

use dler_core::topology::{forward_flat, forward_library, reverse};
use dler_core::{DistTarget, RunCache, SourceFile, TargetKind, TopologyResolver};
use dler_fs::NormalizedPath;
use dler_test_utils::TestProject;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn paths(items: &[NormalizedPath]) -> Vec<&str> {
    items.iter().map(NormalizedPath::as_str).collect()
}

fn source(path: &str) -> SourceFile {
    SourceFile {
        path: NormalizedPath::new(path),
        content: "x // <dler-remove-line>\n".to_string(),
    }
}

#[rstest]
#[case("src/a/b.ts", vec!["dist-npm/bin/a/b.js", "dist-npm/bin/a/b.ts"])]
#[case("src/types.d.ts", vec!["dist-npm/bin/types.d.ts"])]
#[case("src/data.json", vec!["dist-npm/bin/data.json"])]
#[case("other/a.ts", vec![])]
fn forward_flat_candidates(#[case] src: &str, #[case] expected: Vec<&str>) {
    let out = forward_flat(&NormalizedPath::new(src), "src", "dist-npm/bin");
    assert_eq!(paths(&out), expected);
}

#[test]
fn forward_library_fans_out_per_registry() {
    let registries = vec!["jsr".to_string(), "npm".to_string()];
    let out = forward_library(&NormalizedPath::new("src/libs/sdk/x.ts"), "src", "sdk", &registries);
    let rendered: Vec<(String, String)> = out
        .into_iter()
        .map(|(registry, path)| (registry, path.to_string()))
        .collect();
    assert_eq!(
        rendered,
        vec![
            ("jsr".to_string(), "dist-libs/sdk/jsr/bin/x.js".to_string()),
            ("jsr".to_string(), "dist-libs/sdk/jsr/bin/x.ts".to_string()),
            ("npm".to_string(), "dist-libs/sdk/npm/bin/x.js".to_string()),
            ("npm".to_string(), "dist-libs/sdk/npm/bin/x.ts".to_string()),
        ]
    );
}

#[test]
fn forward_library_ignores_other_libraries() {
    let out = forward_library(
        &NormalizedPath::new("src/libs/other/x.ts"),
        "src",
        "sdk",
        &["npm".to_string()],
    );
    assert!(out.is_empty());
}

#[rstest]
#[case("dist-npm/bin/a/b.js", "src/a/b.ts")]
#[case("dist-jsr/bin/a.ts", "src/a.ts")]
#[case("dist-libs/sdk/npm/bin/x.js", "src/libs/sdk/x.ts")]
#[case("dist-libs/sdk/jsr/bin/types.d.ts", "src/libs/sdk/types.ts")]
fn reverse_first_candidate(#[case] dist: &str, #[case] expected: &str) {
    let candidates = reverse(&NormalizedPath::new(dist), "src");
    assert_eq!(candidates.first().map(NormalizedPath::as_str), Some(expected));
}

#[rstest]
#[case("dist-npm/a.js")]
#[case("dist-libs/sdk/deno/bin/x.js")]
#[case("dist-libs/sdk/npm/x.js")]
#[case("build/bin/x.js")]
fn reverse_outside_grammar_has_no_source(#[case] dist: &str) {
    assert!(reverse(&NormalizedPath::new(dist), "src").is_empty());
}

fn resolver(project: &TestProject) -> TopologyResolver {
    let root = project.normalized_root();
    let cache = Arc::new(RunCache::new(root.clone(), Vec::new()));
    TopologyResolver::new(root, "src", cache)
}

#[tokio::test]
async fn library_expansion_only_yields_existing_files() {
    let project = TestProject::new();
    project.write("src/libs/sdk/x.ts", "x // <dler-remove-line>\n");
    project.write("dist-libs/sdk/npm/bin/x.js", "x\n");
    project.write("dist-libs/sdk/jsr/bin/x.ts", "x\n");
    project.mkdir("dist-libs/sdk/deno/bin");

    let files = resolver(&project)
        .expand(&DistTarget::Library("sdk".to_string()), &[source("src/libs/sdk/x.ts")])
        .await
        .unwrap();

    let mut found: Vec<(String, Option<&str>)> = files
        .iter()
        .map(|f| (f.path.to_string(), f.registry()))
        .collect();
    found.sort();
    assert_eq!(
        found,
        vec![
            ("dist-libs/sdk/jsr/bin/x.ts".to_string(), Some("jsr")),
            ("dist-libs/sdk/npm/bin/x.js".to_string(), Some("npm")),
        ]
    );
    assert!(files.iter().all(|f| f.target == "dist-libs/sdk"));
}

#[tokio::test]
async fn all_libraries_expands_every_library() {
    let project = TestProject::new();
    project.write("src/libs/a/x.ts", "");
    project.write("src/libs/b/y.ts", "");
    project.write("dist-libs/a/npm/bin/x.js", "");
    project.write("dist-libs/b/npm/bin/y.js", "");

    let files = resolver(&project)
        .expand(
            &DistTarget::AllLibraries,
            &[source("src/libs/a/x.ts"), source("src/libs/b/y.ts")],
        )
        .await
        .unwrap();

    let libraries: Vec<Option<&str>> = files.iter().map(|f| f.library_name()).collect();
    assert_eq!(libraries, vec![Some("a"), Some("b")]);
}

#[tokio::test]
async fn flat_expansion_requires_dist_root() {
    let project = TestProject::new();
    project.write("src/a.ts", "");

    let err = resolver(&project)
        .expand(&DistTarget::Npm, &[source("src/a.ts")])
        .await
        .unwrap_err();
    assert!(matches!(err, dler_core::Error::Discovery { .. }), "{err}");
}

#[tokio::test]
async fn flat_expansion_marks_kind() {
    let project = TestProject::new();
    project.write("dist-jsr/bin/a.ts", "");

    let files = resolver(&project)
        .expand(&DistTarget::Jsr, &[source("src/a.ts")])
        .await
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].kind, TargetKind::Flat);
    assert_eq!(files[0].path.as_str(), "dist-jsr/bin/a.ts");
}

#[tokio::test]
async fn resolve_source_prefers_first_existing_candidate() {
    let project = TestProject::new();
    project.write("src/a.js", "");
    project.write("src/a.ts", "");
    project.write("src/b.mjs", "");

    let resolver = resolver(&project);
    assert_eq!(
        resolver.resolve_source(&NormalizedPath::new("dist-npm/bin/a.js")).await,
        Some(NormalizedPath::new("src/a.ts"))
    );
    assert_eq!(
        resolver.resolve_source(&NormalizedPath::new("dist-npm/bin/b.js")).await,
        Some(NormalizedPath::new("src/b.mjs"))
    );
    assert_eq!(
        resolver.resolve_source(&NormalizedPath::new("dist-npm/bin/c.js")).await,
        None
    );
}
