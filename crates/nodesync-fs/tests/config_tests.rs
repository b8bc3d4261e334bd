use nodesync_fs::{ConfigStore, Error};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct TestDocument {
    name: String,
    count: i32,
}

#[test]
fn test_load_toml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("doc.toml");
    fs::write(&path, "name = \"test\"\ncount = 42").unwrap();

    let doc: TestDocument = ConfigStore::new().load(&path).unwrap();
    assert_eq!(doc, TestDocument { name: "test".into(), count: 42 });
}

#[test]
fn test_load_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("doc.json");
    fs::write(&path, r#"{"name": "test", "count": 42}"#).unwrap();

    let doc: TestDocument = ConfigStore::new().load(&path).unwrap();
    assert_eq!(doc.count, 42);
}

#[test]
fn test_load_yaml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("doc.yml");
    fs::write(&path, "name: test\ncount: 42").unwrap();

    let doc: TestDocument = ConfigStore::new().load(&path).unwrap();
    assert_eq!(doc.name, "test");
}

#[test]
fn test_save_then_load_each_format() {
    let temp = TempDir::new().unwrap();
    let store = ConfigStore::new();
    let doc = TestDocument { name: "saved".into(), count: 7 };

    for ext in ["toml", "json", "yaml"] {
        let path = temp.path().join(format!("nested/doc.{ext}"));
        store.save(&path, &doc).unwrap();
        let loaded: TestDocument = store.load(&path).unwrap();
        assert_eq!(loaded, doc, "format {ext}");
    }
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("doc.ini");
    fs::write(&path, "x").unwrap();

    let result: Result<TestDocument, _> = ConfigStore::new().load(&path);
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}

#[test]
fn test_parse_error_names_format() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("doc.json");
    fs::write(&path, "{not json").unwrap();

    let err = ConfigStore::new().load::<TestDocument>(&path).unwrap_err();
    assert!(err.to_string().contains("JSON"), "got: {err}");
}

#[test]
fn test_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.toml");

    let err = ConfigStore::new().load::<TestDocument>(&path).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}
