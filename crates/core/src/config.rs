use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "prerender.toml";

/// Raw TOML configuration structure
/// This matches the prerender.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    list: Vec<RawList>,
}

#[derive(Debug, Deserialize)]
struct RawList {
    kind: String,
    path: String, // Convert to PathBuf
    source: RawSource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawSource {
    File(String),
    Dir(String),
}

/// Where a list builder pulls its entries from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSource {
    /// A JSON array of entries
    File(PathBuf),
    /// A directory of `*.toml` files, one entry each
    Dir(PathBuf),
}

/// One configured list: its target on disk plus its content source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    pub target: ListTarget,
    pub source: ListSource,
}

/// Parsed prerender.toml
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub lists: Vec<ListConfig>,
}

impl ProjectConfig {
    /// Targets of every list, in configuration order
    pub fn targets(&self) -> Vec<ListTarget> {
        self.lists.iter().map(|l| l.target.clone()).collect()
    }
}

/// Parse prerender.toml from a file path
pub fn parse_project_toml<P: AsRef<Path>>(path: P) -> Result<ProjectConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_project_toml_str(&content)
}

/// Parse prerender.toml from a string (useful for testing)
pub fn parse_project_toml_str(content: &str) -> Result<ProjectConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.list.is_empty() {
        return Err(Error::ConfigParse(
            "At least one [[list]] must be configured".to_string(),
        ));
    }

    let mut seen_kinds = HashSet::new();
    let mut seen_paths = HashSet::new();

    let lists: Result<Vec<ListConfig>> = raw
        .list
        .into_iter()
        .map(|l| {
            let kind = ListKind::new(l.kind)?;
            if !seen_kinds.insert(kind.clone()) {
                return Err(Error::ConfigParse(format!(
                    "List kind '{}' is configured more than once",
                    kind
                )));
            }

            let path = validate_path(&l.path, "list.path")?;
            if !seen_paths.insert(path.clone()) {
                return Err(Error::ConfigParse(format!(
                    "List path '{}' is shared by more than one list",
                    l.path
                )));
            }

            let source = match l.source {
                RawSource::File(p) => ListSource::File(validate_path(&p, "list.source.file")?),
                RawSource::Dir(p) => ListSource::Dir(validate_path(&p, "list.source.dir")?),
            };

            Ok(ListConfig {
                target: ListTarget { kind, path },
                source,
            })
        })
        .collect();

    Ok(ProjectConfig { lists: lists? })
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and `..` components so a project config can only
/// read and write inside its own project directory.
///
/// ```text
/// validate_path("static/app-list.json", "list.path")  → Ok(PathBuf)
/// validate_path("/etc/passwd", "list.path")  → Err("Absolute paths not allowed...")
/// validate_path("../other/list.json", "list.path")  → Err("Parent directory references...")
/// ```
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use paths relative to the project root.",
            field_name, path_str
        )));
    }

    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_LISTS: &str = r#"
[[list]]
kind = "app"
path = "static/app-list.json"
source = { dir = "content/apps" }

[[list]]
kind = "game"
path = "static/game-list.json"
source = { file = "content/games.json" }
"#;

    #[test]
    fn test_parse_two_lists() {
        let config = parse_project_toml_str(TWO_LISTS).unwrap();
        assert_eq!(config.lists.len(), 2);

        assert_eq!(config.lists[0].target.kind, ListKind::app());
        assert_eq!(
            config.lists[0].target.path,
            PathBuf::from("static/app-list.json")
        );
        assert_eq!(
            config.lists[0].source,
            ListSource::Dir(PathBuf::from("content/apps"))
        );

        assert_eq!(config.lists[1].target.kind, ListKind::game());
        assert_eq!(
            config.lists[1].source,
            ListSource::File(PathBuf::from("content/games.json"))
        );
    }

    #[test]
    fn test_targets_keep_config_order() {
        let config = parse_project_toml_str(TWO_LISTS).unwrap();
        let kinds: Vec<_> = config
            .targets()
            .into_iter()
            .map(|t| t.kind.to_string())
            .collect();
        assert_eq!(kinds, vec!["app", "game"]);
    }

    #[test]
    fn test_parse_rejects_empty_config() {
        let result = parse_project_toml_str("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("At least one"));
    }

    #[test]
    fn test_parse_rejects_duplicate_kind() {
        let toml = r#"
[[list]]
kind = "app"
path = "static/a.json"
source = { dir = "content/a" }

[[list]]
kind = "app"
path = "static/b.json"
source = { dir = "content/b" }
"#;
        let result = parse_project_toml_str(toml);
        assert!(result.unwrap_err().to_string().contains("more than once"));
    }

    #[test]
    fn test_parse_rejects_shared_path() {
        let toml = r#"
[[list]]
kind = "app"
path = "static/list.json"
source = { dir = "content/a" }

[[list]]
kind = "game"
path = "static/list.json"
source = { dir = "content/b" }
"#;
        let result = parse_project_toml_str(toml);
        assert!(result.unwrap_err().to_string().contains("shared"));
    }

    #[test]
    fn test_parse_rejects_invalid_kind() {
        let toml = r#"
[[list]]
kind = "Apps"
path = "static/app-list.json"
source = { dir = "content/apps" }
"#;
        let result = parse_project_toml_str(toml);
        assert!(result.unwrap_err().to_string().contains("Invalid list kind"));
    }

    #[test]
    fn test_parse_rejects_unknown_source() {
        let toml = r#"
[[list]]
kind = "app"
path = "static/app-list.json"
source = { url = "https://example.com/apps.json" }
"#;
        assert!(parse_project_toml_str(toml).is_err());
    }

    #[test]
    fn test_parse_rejects_path_traversal_in_list_path() {
        let toml = r#"
[[list]]
kind = "app"
path = "../../etc/app-list.json"
source = { dir = "content/apps" }
"#;
        let result = parse_project_toml_str(toml);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Parent directory references")
        );
    }

    #[test]
    fn test_parse_rejects_absolute_source() {
        let toml = r#"
[[list]]
kind = "app"
path = "static/app-list.json"
source = { file = "/etc/apps.json" }
"#;
        let result = parse_project_toml_str(toml);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Absolute paths not allowed"));
        assert!(message.contains("list.source.file"));
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("static/app-list.json", "list.path").is_ok());
        assert!(validate_path("content/nested/dir", "list.source.dir").is_ok());
        assert!(validate_path("", "list.path").is_err());
        assert!(validate_path("   ", "list.path").is_err());
        assert!(validate_path("static/../../x.json", "list.path").is_err());
    }
}
