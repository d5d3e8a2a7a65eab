use anyhow::{Context, Result};
use prerender_kit_core::CONFIG_FILE_NAME;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_TEMPLATE: &str = r#"# prerender-kit project configuration
#
# Each [[list]] is built, saved to `path` as a JSON array and read back.
# Routes are derived from every entry's `endpoint`, plus one /kind/<slug>
# route per distinct section.

[[list]]
kind = "app"
path = "static/app-list.json"
source = { dir = "content/apps" }

[[list]]
kind = "game"
path = "static/game-list.json"
source = { dir = "content/games" }
"#;

const APP_TEMPLATE: &str = r#"# slug defaults to the file name, endpoint to /app/<slug>
name = "Example App"

[section]
slug = "productivity"
"#;

const GAME_TEMPLATE: &str = r#"# slug defaults to the file name, endpoint to /game/<slug>
name = "Example Game"

[section]
slug = "arcade"
"#;

/// Scaffold a project directory with prerender.toml and one example entry
/// per list.
///
/// Fails if the directory does not exist or already has a prerender.toml.
/// Existing entry files are left alone.
pub async fn run(path: PathBuf) -> Result<()> {
    println!("Initializing project: {}", path.display());

    if !path.exists() {
        anyhow::bail!(
            "Directory '{}' does not exist. Create it first: mkdir {}",
            path.display(),
            path.display()
        );
    }

    let config_path = path.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!(
            "{} already exists at {}\nHint: Delete it first or use a different directory",
            CONFIG_FILE_NAME,
            config_path.display()
        );
    }

    create_structure(&path)?;

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  ├── {}       ← Configure lists here", CONFIG_FILE_NAME);
    println!("  ├── content/");
    println!("  │   ├── apps/example-app.toml");
    println!("  │   └── games/example-game.toml");
    println!("  └── static/");

    println!("\nNext steps:");
    println!("  1. Add one .toml file per entry under content/");
    println!("  2. Build lists: prerender-kit lists {}", path.display());
    println!("  3. List routes: prerender-kit routes {}", path.display());

    Ok(())
}

fn create_structure(base: &Path) -> Result<()> {
    fs::create_dir_all(base.join("content").join("apps"))
        .context("Failed to create content/apps directory")?;
    fs::create_dir_all(base.join("content").join("games"))
        .context("Failed to create content/games directory")?;
    fs::create_dir_all(base.join("static")).context("Failed to create static directory")?;

    write_if_missing(
        &base.join("content").join("apps").join("example-app.toml"),
        APP_TEMPLATE,
    )?;
    write_if_missing(
        &base.join("content").join("games").join("example-game.toml"),
        GAME_TEMPLATE,
    )?;

    fs::write(base.join(CONFIG_FILE_NAME), CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
