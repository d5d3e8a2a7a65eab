use anyhow::{Context, Result};
use async_trait::async_trait;
use prerender_kit_core::{Entry, ListKind, ListSource};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::ListBuilder;

const MAX_SCAN_DEPTH: usize = 2; // Maximum directory depth for entry file scanning

/// Pick the builder for a configured source
pub fn builder_for(root: &Path, kind: &ListKind, source: &ListSource) -> Arc<dyn ListBuilder> {
    match source {
        ListSource::File(path) => Arc::new(JsonFileBuilder::new(root.join(path))),
        ListSource::Dir(path) => Arc::new(TomlDirBuilder::new(kind.clone(), root.join(path))),
    }
}

/// Reads a list from a JSON array of entries
#[derive(Debug, Clone)]
pub struct JsonFileBuilder {
    path: PathBuf,
}

impl JsonFileBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ListBuilder for JsonFileBuilder {
    async fn build(&self) -> Result<Vec<Entry>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse entries from {}", self.path.display()))
    }
}

/// Builds a list from a directory of `*.toml` files, one entry per file.
///
/// `slug` defaults to the file stem and `endpoint` to the kind's detail route.
/// Entries come out sorted by file path.
#[derive(Debug, Clone)]
pub struct TomlDirBuilder {
    kind: ListKind,
    dir: PathBuf,
}

impl TomlDirBuilder {
    pub fn new(kind: ListKind, dir: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            dir: dir.into(),
        }
    }
}

#[async_trait]
impl ListBuilder for TomlDirBuilder {
    async fn build(&self) -> Result<Vec<Entry>> {
        let files = scan_entry_files(&self.dir)?;
        let mut entries = Vec::with_capacity(files.len());

        for file in files {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let entry = parse_entry_file(&self.kind, &file, &content)
                .with_context(|| format!("Invalid entry file {}", file.display()))?;
            entries.push(entry);
        }

        Ok(entries)
    }
}

/// Collect `*.toml` files under `dir`, sorted by path
fn scan_entry_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("Entry directory does not exist: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).max_depth(MAX_SCAN_DEPTH).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
        {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

fn parse_entry_file(kind: &ListKind, file: &Path, content: &str) -> Result<Entry> {
    let table: toml::Table = toml::from_str(content)?;
    let mut value = serde_json::to_value(table)?;
    let object = value
        .as_object_mut()
        .context("Entry file must be a TOML table")?;

    if !object.contains_key("slug") {
        let stem = file
            .file_stem()
            .and_then(|s| s.to_str())
            .context("Entry file name is not valid UTF-8")?;
        object.insert("slug".to_string(), Value::String(stem.to_string()));
    }

    if !object.contains_key("endpoint") {
        let slug = object
            .get("slug")
            .and_then(Value::as_str)
            .context("slug must be a string")?;
        let endpoint = kind.entry_route(slug);
        object.insert("endpoint".to_string(), Value::String(endpoint));
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Helper to create a directory of entry files
    fn create_entry_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_json_file_builder_reads_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("games.json");
        fs::write(
            &path,
            r#"[{"slug":"doom","endpoint":"/game/doom","section":{"slug":"shooter"},"fps":60}]"#,
        )
        .unwrap();

        let entries = JsonFileBuilder::new(&path).build().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].slug(), "doom");
        assert_eq!(entries[0].get("fps").unwrap(), 60);
    }

    #[tokio::test]
    async fn test_json_file_builder_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = JsonFileBuilder::new(dir.path().join("nope.json"))
            .build()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[tokio::test]
    async fn test_toml_dir_builder_fills_defaults() {
        let dir = create_entry_dir(&[(
            "blender.toml",
            "name = \"Blender\"\n[section]\nslug = \"3d\"\n",
        )]);

        let entries = TomlDirBuilder::new(ListKind::app(), dir.path())
            .build()
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].slug(), "blender");
        assert_eq!(entries[0].endpoint(), "/app/blender");
        assert_eq!(entries[0].section_slug(), "3d");
        assert_eq!(entries[0].get("name").unwrap(), "Blender");
    }

    #[tokio::test]
    async fn test_toml_dir_builder_keeps_explicit_fields() {
        let dir = create_entry_dir(&[(
            "x.toml",
            "slug = \"vs-code\"\nendpoint = \"/app/visual-studio-code\"\n[section]\nslug = \"dev\"\n",
        )]);

        let entries = TomlDirBuilder::new(ListKind::app(), dir.path())
            .build()
            .await
            .unwrap();
        assert_eq!(entries[0].slug(), "vs-code");
        assert_eq!(entries[0].endpoint(), "/app/visual-studio-code");
    }

    #[tokio::test]
    async fn test_toml_dir_builder_keeps_key_order() {
        let dir = create_entry_dir(&[(
            "zed.toml",
            "status = \"native\"\nname = \"Zed\"\n[section]\nslug = \"editors\"\nlabel = \"Editors\"\n",
        )]);

        let entries = TomlDirBuilder::new(ListKind::app(), dir.path())
            .build()
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_string(&entries[0]).unwrap(),
            r#"{"status":"native","name":"Zed","section":{"slug":"editors","label":"Editors"},"slug":"zed","endpoint":"/app/zed"}"#
        );
    }

    #[tokio::test]
    async fn test_toml_dir_builder_sorted_and_filtered() {
        let dir = create_entry_dir(&[
            ("b.toml", "[section]\nslug = \"s\"\n"),
            ("a.toml", "[section]\nslug = \"s\"\n"),
            ("nested/c.toml", "[section]\nslug = \"s\"\n"),
            ("readme.md", "# not an entry"),
        ]);

        let entries = TomlDirBuilder::new(ListKind::game(), dir.path())
            .build()
            .await
            .unwrap();
        let slugs: Vec<_> = entries.iter().map(|e| e.slug()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
        assert_eq!(entries[2].endpoint(), "/game/c");
    }

    #[tokio::test]
    async fn test_toml_dir_builder_requires_section() {
        let dir = create_entry_dir(&[("broken.toml", "name = \"Broken\"\n")]);

        let err = TomlDirBuilder::new(ListKind::app(), dir.path())
            .build()
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("section"));
    }

    #[tokio::test]
    async fn test_toml_dir_builder_missing_dir() {
        let dir = TempDir::new().unwrap();
        let err = TomlDirBuilder::new(ListKind::app(), dir.path().join("missing"))
            .build()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_builder_for_resolves_against_root() {
        let dir = create_entry_dir(&[(
            "content/games.json",
            r#"[{"slug":"g","endpoint":"/game/g","section":{"slug":"arcade"}}]"#,
        )]);

        let builder = builder_for(
            dir.path(),
            &ListKind::game(),
            &ListSource::File(PathBuf::from("content/games.json")),
        );
        let entries = builder.build().await.unwrap();
        assert_eq!(entries[0].section_slug(), "arcade");
    }
}
