use anyhow::{Context, Result};
use prerender_kit_routes::derive_routes;
use std::fs;
use std::path::{Path, PathBuf};

use super::project::Project;

/// Print the routes derived from the saved lists
pub async fn run(path: PathBuf, json: bool, output: Option<PathBuf>) -> Result<()> {
    let project = Project::load(&path)?;
    let routes = derive(&project).await?;

    // stdout carries only the routes so hosts can pipe them
    if json {
        println!("{}", serde_json::to_string_pretty(&routes)?);
    } else {
        for route in &routes {
            println!("{}", route);
        }
    }

    if let Some(output) = output {
        write_routes_file(&output, &routes)?;
        tracing::info!(path = %output.display(), "Wrote route list");
    }

    Ok(())
}

pub(crate) async fn derive(project: &Project) -> Result<Vec<String>> {
    derive_routes(&project.root, &project.targets())
        .await
        .context("Failed to derive routes from saved lists")
}

/// Save routes as a JSON array
pub(crate) fn write_routes_file(path: &Path, routes: &[String]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(routes).context("Failed to serialize routes")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_routes_file_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dist").join("routes.json");
        let routes = vec!["/app/a".to_string(), "/kind/tools".to_string()];

        write_routes_file(&path, &routes).unwrap();

        let saved: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, routes);
    }
}
