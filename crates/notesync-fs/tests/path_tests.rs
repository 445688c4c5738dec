//! Tests for NormalizedPath cleaning and resolution

use notesync_fs::{NormalizedPath, display_relative, resolve_path};
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

#[rstest]
#[case("a/../b", "b")]
#[case("../a", "../a")]
#[case("/a/b/../../c", "/c")]
#[case("/../a", "/a")]
#[case("a\\..\\b", "b")]
#[case("a/./b//c", "a/b/c")]
#[case("refs/a.pdf", "refs/a.pdf")]
#[case("//server/share/x", "//server/share/x")]
fn test_lexical_cleaning(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).as_str(), expected);
}

#[test]
fn test_relative_and_absolute_references_resolve_equal() {
    let temp = TempDir::new().unwrap();
    let root = NormalizedPath::new(dunce::canonicalize(temp.path()).unwrap());
    fs::create_dir_all(temp.path().join("refs")).unwrap();
    fs::write(temp.path().join("refs/a.pdf"), b"%PDF").unwrap();

    let relative = resolve_path(&root, "refs/a.pdf");
    let absolute = resolve_path(&root, temp.path().join("refs").join("a.pdf"));
    let dotted = resolve_path(&root, "./refs/../refs/a.pdf");

    assert_eq!(relative, absolute);
    assert_eq!(relative, dotted);
}

#[test]
fn test_resolve_missing_file_keeps_lexical_tail() {
    let temp = TempDir::new().unwrap();
    let root = NormalizedPath::new(dunce::canonicalize(temp.path()).unwrap());

    let resolved = resolve_path(&root, "refs/nope/missing.pdf");
    assert_eq!(resolved, root.join("refs/nope/missing.pdf"));
    assert!(!resolved.exists());
}

#[test]
fn test_display_relative_inside_and_outside_root() {
    let root = NormalizedPath::new("/work/space");
    assert_eq!(
        display_relative(&NormalizedPath::new("/work/space/notes/a.md"), &root),
        "notes/a.md"
    );
    assert_eq!(
        display_relative(&NormalizedPath::new("/elsewhere/a.md"), &root),
        "/elsewhere/a.md"
    );
}
