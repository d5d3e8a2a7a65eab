use anyhow::{Context, Result};
use prerender_kit_core::{CONFIG_FILE_NAME, ListTarget, ProjectConfig, parse_project_toml};
use prerender_kit_lists::ListSpec;
use std::path::{Path, PathBuf};

/// A project directory with its parsed prerender.toml
pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
}

impl Project {
    /// Load prerender.toml from a project directory
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Project directory does not exist: {}", path.display());
        }

        let config_path = path.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            anyhow::bail!(
                "{} not found in {}\nRun 'prerender-kit init {}' first",
                CONFIG_FILE_NAME,
                path.display(),
                path.display()
            );
        }

        let config = parse_project_toml(&config_path)
            .with_context(|| format!("Failed to parse {}", CONFIG_FILE_NAME))?;

        Ok(Self {
            root: path.to_path_buf(),
            config,
        })
    }

    /// Bind every configured list to the builder for its source
    pub fn specs(&self) -> Vec<ListSpec> {
        self.config
            .lists
            .iter()
            .map(|list| ListSpec::from_config(&self.root, list))
            .collect()
    }

    pub fn targets(&self) -> Vec<ListTarget> {
        self.config.targets()
    }
}
