use nodesync_fs::RelativePath;
use rstest::rstest;

#[rstest]
#[case("file.txt", "/file.txt")]
#[case("/file.txt", "/file.txt")]
#[case("dir\\sub\\file.txt", "/dir/sub/file.txt")]
#[case("dir/sub\\file.txt", "/dir/sub/file.txt")]
#[case("//dir///file.txt", "/dir/file.txt")]
#[case("/dir/", "/dir")]
#[case("/dir/./file.txt", "/dir/file.txt")]
#[case("/a/../b", "/b")]
#[case("../../a/b", "/a/b")]
#[case("", "/")]
#[case("\\", "/")]
fn test_normalization(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(RelativePath::new(input).as_str(), expected);
}

#[test]
fn test_join_paths() {
    let base = RelativePath::new("/foo/bar");
    assert_eq!(base.join("baz").as_str(), "/foo/bar/baz");
    assert_eq!(RelativePath::root().join("baz").as_str(), "/baz");
}

#[test]
fn test_parent() {
    let path = RelativePath::new("/foo/bar/baz");
    assert_eq!(path.parent().unwrap().as_str(), "/foo/bar");
}

#[test]
fn test_file_name() {
    assert_eq!(RelativePath::new("/foo/bar/baz.txt").file_name(), "baz.txt");
    assert_eq!(RelativePath::root().file_name(), "");
}

#[test]
fn test_depth() {
    assert_eq!(RelativePath::root().depth(), 0);
    assert_eq!(RelativePath::new("/a").depth(), 1);
    assert_eq!(RelativePath::new("/a/b/c").depth(), 3);
}

#[test]
fn test_is_under_root() {
    let root = RelativePath::root();
    assert!(RelativePath::new("/a").is_under(&root));
    assert!(!root.is_under(&root));
}

#[test]
fn test_serde_uses_normalized_string() {
    let path: RelativePath = serde_json::from_str(r#""dir\\file.txt""#).unwrap();
    assert_eq!(path.as_str(), "/dir/file.txt");
    assert_eq!(serde_json::to_string(&path).unwrap(), r#""/dir/file.txt""#);
}
