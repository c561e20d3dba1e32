//! JSON output, flat and nested.
//!
//! Both writers accumulate every entry first and serialize once. The file
//! is only touched after serialization succeeded, so a failure never leaves
//! a partial JSON file behind.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::file::write_chunks;
use super::EntryWriter;
use crate::error::WriteResult;
use crate::models::{FileSummary, KeyPath};

/// Entry for [`JsonFlatWriter`]: the key is already rendered by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatEntry {
    pub key: String,
    pub value: String,
}

/// Entry for [`JsonTreeWriter`]: one object level per path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: KeyPath,
    pub value: String,
}

/// `{ "key": "value", ... }`, last write wins on duplicate keys.
#[derive(Debug, Clone)]
pub struct JsonFlatWriter {
    file_path: PathBuf,
}

impl JsonFlatWriter {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

impl EntryWriter for JsonFlatWriter {
    type Entry = FlatEntry;

    fn file_path(&self) -> &Path {
        &self.file_path
    }

    async fn write<I>(&self, entries: I) -> WriteResult<FileSummary>
    where
        I: IntoIterator<Item = Self::Entry>,
    {
        let mut data = Map::new();
        let mut entry_count = 0;
        for entry in entries {
            data.insert(entry.key, Value::String(entry.value));
            entry_count += 1;
        }

        write_document(&self.file_path, data, entry_count).await
    }
}

/// Nested objects built from entry paths.
#[derive(Debug, Clone)]
pub struct JsonTreeWriter {
    file_path: PathBuf,
}

impl JsonTreeWriter {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

impl EntryWriter for JsonTreeWriter {
    type Entry = TreeEntry;

    fn file_path(&self) -> &Path {
        &self.file_path
    }

    async fn write<I>(&self, entries: I) -> WriteResult<FileSummary>
    where
        I: IntoIterator<Item = Self::Entry>,
    {
        let mut data = Map::new();
        let mut entry_count = 0;
        for entry in entries {
            set_path(&mut data, &entry.path, entry.value);
            entry_count += 1;
        }

        write_document(&self.file_path, data, entry_count).await
    }
}

/// Set `value` at `path`, creating intermediate objects.
///
/// An intermediate segment currently holding a string is replaced by an
/// object. An empty path sets nothing.
pub fn set_path(root: &mut Map<String, Value>, path: &[String], value: String) {
    let Some((leaf, parents)) = path.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        let slot = node
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(child) = slot else {
            return;
        };
        node = child;
    }

    node.insert(leaf.clone(), Value::String(value));
}

async fn write_document(
    path: &Path,
    data: Map<String, Value>,
    entry_count: usize,
) -> WriteResult<FileSummary> {
    let json = serde_json::to_string_pretty(&Value::Object(data))?;
    let summary = write_chunks(path, [json]).await?;

    Ok(FileSummary {
        entry_count,
        ..summary
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn tree(path: &[&str], value: &str) -> TreeEntry {
        TreeEntry {
            path: path.iter().map(|s| s.to_string()).collect(),
            value: value.to_string(),
        }
    }

    fn flat(key: &str, value: &str) -> FlatEntry {
        FlatEntry {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_tree_merges_siblings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");

        let summary = JsonTreeWriter::new(&path)
            .write(vec![tree(&["a", "b"], "x"), tree(&["a", "c"], "y")])
            .await
            .unwrap();

        assert_eq!(summary.entry_count, 2);
        assert_eq!(read_json(&path), json!({"a": {"b": "x", "c": "y"}}));
    }

    #[tokio::test]
    async fn test_tree_output_is_pretty_printed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");

        JsonTreeWriter::new(&path)
            .write(vec![tree(&["a", "b"], "x")])
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n  \"a\": {\n    \"b\": \"x\"\n  }\n}"
        );
    }

    #[tokio::test]
    async fn test_tree_scalar_replaced_by_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");

        let summary = JsonTreeWriter::new(&path)
            .write(vec![tree(&["home"], "Home"), tree(&["home", "title"], "Welcome")])
            .await
            .unwrap();

        assert_eq!(summary.entry_count, 2);
        assert_eq!(read_json(&path), json!({"home": {"title": "Welcome"}}));
    }

    #[tokio::test]
    async fn test_tree_object_replaced_by_scalar() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");

        JsonTreeWriter::new(&path)
            .write(vec![tree(&["home", "title"], "Welcome"), tree(&["home"], "Home")])
            .await
            .unwrap();

        assert_eq!(read_json(&path), json!({"home": "Home"}));
    }

    #[tokio::test]
    async fn test_tree_empty_path_counted_but_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");

        let summary = JsonTreeWriter::new(&path)
            .write(vec![tree(&[], "orphan"), tree(&["k"], "v")])
            .await
            .unwrap();

        assert_eq!(summary.entry_count, 2);
        assert_eq!(read_json(&path), json!({"k": "v"}));
    }

    #[tokio::test]
    async fn test_tree_keeps_insertion_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");

        JsonTreeWriter::new(&path)
            .write(vec![tree(&["zebra"], "z"), tree(&["apple"], "a")])
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.find("zebra").unwrap() < content.find("apple").unwrap());
    }

    #[tokio::test]
    async fn test_flat_last_write_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flat/en.json");

        let summary = JsonFlatWriter::new(&path)
            .write(vec![
                flat("home.title", "Welcome"),
                flat("home.subtitle", "Hi"),
                flat("home.title", "Welcome back"),
            ])
            .await
            .unwrap();

        assert_eq!(summary.entry_count, 3);
        assert_eq!(
            read_json(&path),
            json!({"home.title": "Welcome back", "home.subtitle": "Hi"})
        );
    }

    #[tokio::test]
    async fn test_empty_input_writes_empty_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");

        let summary = JsonFlatWriter::new(&path).write(Vec::new()).await.unwrap();

        assert_eq!(summary.entry_count, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_set_path_deep() {
        let mut root = Map::new();
        set_path(&mut root, &["a".into(), "b".into(), "c".into()], "x".into());
        set_path(&mut root, &["a".into(), "d".into()], "y".into());

        assert_eq!(Value::Object(root), json!({"a": {"b": {"c": "x"}, "d": "y"}}));
    }
}
