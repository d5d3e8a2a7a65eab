use anyhow::Result;
use prerender_kit_lists::Hook;
use std::path::PathBuf;

use super::lists::{materialize, print_summary};
use super::project::Project;
use super::routes::{derive, write_routes_file};

/// Run the before-generate hook, then derive the route list from its output
pub async fn run(path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("🔨 Generating route list...");
    println!("   Project: {}", path.display());
    println!();

    let project = Project::load(&path)?;

    println!("📋 Building lists...");
    let lists = materialize(&project, Hook::BeforeGenerate).await?;
    print_summary(&project.root, &lists);

    println!("🧭 Deriving routes...");
    let routes = derive(&project).await?;
    let entry_routes: usize = lists.iter().map(|l| l.entries.len()).sum();
    let section_routes = routes.len().saturating_sub(entry_routes);
    println!(
        "   ✓ {} routes ({} section pages)",
        routes.len(),
        section_routes
    );

    if let Some(output) = output {
        write_routes_file(&output, &routes)?;
        println!("   ✓ Wrote {}", output.display());
    }

    println!();
    println!("✅ Generate complete!");

    Ok(())
}
