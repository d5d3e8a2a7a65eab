use anyhow::{Context, Result};
use prerender_kit_lists::{Hook, MaterializedList, run_hook};
use std::path::{Path, PathBuf};

use super::project::Project;

/// Build and save every configured list for a host hook
pub async fn run(path: PathBuf, hook: Hook) -> Result<()> {
    println!("📋 Building lists ({})...", hook);
    println!("   Project: {}", path.display());
    println!();

    let project = Project::load(&path)?;
    let lists = materialize(&project, hook).await?;
    print_summary(&project.root, &lists);

    println!();
    println!("✅ Saved {} list(s)", lists.len());

    Ok(())
}

pub(crate) async fn materialize(project: &Project, hook: Hook) -> Result<Vec<MaterializedList>> {
    let specs = project.specs();
    run_hook(hook, &project.root, &specs)
        .await
        .context("Failed to build lists")
}

pub(crate) fn print_summary(root: &Path, lists: &[MaterializedList]) {
    for list in lists {
        let shown = list.path.strip_prefix(root).unwrap_or(&list.path);
        println!(
            "   ✓ {}: {} entries → {} (sha256 {})",
            list.kind,
            list.entries.len(),
            shown.display(),
            &list.digest[..12]
        );
    }
}
