//! Tests for mapping URIs onto the root directory

use porch::http::path::{PathError, resolve};
use porch::http::response::StatusCode;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds `<tmp>/root` with a few files, plus `<tmp>/secret.txt` and a
/// sibling `<tmp>/root2` outside the root.
fn fixture() -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("root");
    fs::create_dir_all(root.join("sub/deeper")).unwrap();
    fs::write(root.join("index.html"), "<p>hi</p>").unwrap();
    fs::write(root.join("sub/page.txt"), "page").unwrap();
    fs::write(tmp.path().join("secret.txt"), "secret").unwrap();
    fs::create_dir(tmp.path().join("root2")).unwrap();
    fs::write(tmp.path().join("root2/leak.txt"), "leak").unwrap();
    let root = root.canonicalize().unwrap();
    (tmp, root)
}

fn assert_inside(path: &Path, root: &Path) {
    assert!(path.starts_with(root), "{} escaped {}", path.display(), root.display());
}

#[tokio::test]
async fn test_resolve_root_uri() {
    let (_tmp, root) = fixture();

    assert_eq!(resolve(&root, "/").await.unwrap(), root);
}

#[tokio::test]
async fn test_resolve_empty_uri() {
    let (_tmp, root) = fixture();

    assert_eq!(resolve(&root, "").await.unwrap(), root);
}

#[tokio::test]
async fn test_resolve_file() {
    let (_tmp, root) = fixture();

    assert_eq!(
        resolve(&root, "/index.html").await.unwrap(),
        root.join("index.html")
    );
}

#[tokio::test]
async fn test_resolve_trailing_and_repeated_slashes() {
    let (_tmp, root) = fixture();

    assert_eq!(resolve(&root, "/sub/").await.unwrap(), root.join("sub"));
    assert_eq!(
        resolve(&root, "//sub///page.txt").await.unwrap(),
        root.join("sub/page.txt")
    );
}

#[tokio::test]
async fn test_resolve_dot_segments_inside_root() {
    let (_tmp, root) = fixture();

    assert_eq!(
        resolve(&root, "/sub/./deeper/../page.txt").await.unwrap(),
        root.join("sub/page.txt")
    );
    assert_eq!(resolve(&root, "/sub/..").await.unwrap(), root);
}

#[tokio::test]
async fn test_resolve_missing_is_not_found() {
    let (_tmp, root) = fixture();

    let err = resolve(&root, "/missing.html").await.unwrap_err();

    assert!(matches!(err, PathError::NotFound(_)));
    assert_eq!(err.status(), StatusCode::NotFound);
}

#[tokio::test]
async fn test_resolve_parent_of_root_is_rejected() {
    let (_tmp, root) = fixture();

    let err = resolve(&root, "/..").await.unwrap_err();

    assert!(matches!(err, PathError::OutsideRoot(_)));
    assert_eq!(err.status(), StatusCode::BadRequest);
}

#[tokio::test]
async fn test_resolve_traversal_to_existing_file_is_rejected() {
    let (_tmp, root) = fixture();

    for uri in [
        "/../secret.txt",
        "/sub/../../secret.txt",
        "/sub/deeper/../../../secret.txt",
        "/./../secret.txt",
        "//../secret.txt",
        "/../root2/leak.txt",
    ] {
        let result = resolve(&root, uri).await;
        assert!(
            matches!(result, Err(PathError::OutsideRoot(_))),
            "{} resolved to {:?}",
            uri,
            result
        );
    }
}

#[tokio::test]
async fn test_resolve_deep_traversal_never_escapes() {
    let (_tmp, root) = fixture();

    for uri in [
        "/../../etc/passwd",
        "/../../../../../../../../etc/passwd",
        "/../../../../../../../../",
        "/sub/../../../../../../../../etc",
        "/../../../../../../../../tmp",
    ] {
        match resolve(&root, uri).await {
            Ok(path) => panic!("{} resolved to {}", uri, path.display()),
            Err(e) => assert!(
                matches!(e.status(), StatusCode::BadRequest | StatusCode::NotFound),
                "{}: {}",
                uri,
                e
            ),
        }
    }
}

#[tokio::test]
async fn test_resolve_sibling_with_root_as_string_prefix() {
    let (_tmp, root) = fixture();

    // "<root>2/leak.txt" shares the root's text as a prefix but lies outside.
    let result = resolve(&root, "2/leak.txt").await;

    assert!(matches!(result, Err(PathError::OutsideRoot(_))));
}

#[tokio::test]
async fn test_resolve_percent_encoding_is_literal() {
    let (_tmp, root) = fixture();

    // Not decoded, so this names a file literally called "%2e%2e".
    let result = resolve(&root, "/%2e%2e/secret.txt").await;

    assert!(matches!(result, Err(PathError::NotFound(_))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_resolve_symlink_out_of_root_is_rejected() {
    let (tmp, root) = fixture();
    std::os::unix::fs::symlink(tmp.path().join("secret.txt"), root.join("escape")).unwrap();
    std::os::unix::fs::symlink(tmp.path(), root.join("up")).unwrap();

    assert!(matches!(
        resolve(&root, "/escape").await,
        Err(PathError::OutsideRoot(_))
    ));
    assert!(matches!(
        resolve(&root, "/up/secret.txt").await,
        Err(PathError::OutsideRoot(_))
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn test_resolve_symlink_within_root_is_followed() {
    let (_tmp, root) = fixture();
    std::os::unix::fs::symlink(root.join("sub/page.txt"), root.join("alias")).unwrap();

    let resolved = resolve(&root, "/alias").await.unwrap();

    assert_eq!(resolved, root.join("sub/page.txt"));
    assert_inside(&resolved, &root);
}

#[tokio::test]
async fn test_resolve_through_non_canonical_root() {
    let (_tmp, root) = fixture();
    let messy_root = root.join("sub").join("..");

    let resolved = resolve(&messy_root, "/index.html").await.unwrap();

    assert_eq!(resolved, root.join("index.html"));
}

#[tokio::test]
async fn test_resolve_missing_root() {
    let tmp = tempfile::tempdir().unwrap();

    let err = resolve(&tmp.path().join("nope"), "/").await.unwrap_err();

    assert!(matches!(err, PathError::InvalidRoot(_)));
}
