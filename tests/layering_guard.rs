//! Layering guardrails for the workspace crates.
//!
//! `hovermark_core` holds the language vocabulary and the core library declarations and must stay dependency-free.
//! `hovermark_syntax` sits between it and the analysis crate and must never depend on `hovermark` itself.

/// Names in the `[dependencies]` table of a manifest, ignoring comments.
fn dependency_names(manifest: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_has_no_dependencies() {
    let names = dependency_names(include_str!("../crates/hovermark_core/Cargo.toml"));
    assert!(names.is_empty(), "`hovermark_core` must stay dependency-free, found {names:?}");
}

#[test]
fn syntax_does_not_depend_on_the_analysis_crate() {
    let names = dependency_names(include_str!("../crates/hovermark_syntax/Cargo.toml"));
    assert!(names.iter().any(|n| n == "hovermark_core"));
    assert!(
        !names.iter().any(|n| n == "hovermark"),
        "`hovermark_syntax` must not depend on `hovermark`"
    );
}
