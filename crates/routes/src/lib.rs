// Route derivation over materialized lists

use futures::future::try_join_all;
use prerender_kit_core::{Entry, Error, ListTarget, Result, SECTION_ROUTE_PREFIX};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Distinct section slugs in first-seen order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SectionSet {
    slugs: Vec<String>,
    seen: HashSet<String>,
}

impl SectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the slug was already present
    pub fn insert(&mut self, slug: &str) -> bool {
        if !self.seen.insert(slug.to_string()) {
            return false;
        }
        self.slugs.push(slug.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.slugs.iter().map(String::as_str)
    }

    /// One `/kind/<slug>` route per section
    pub fn routes(&self) -> impl Iterator<Item = String> + '_ {
        self.iter().map(|slug| format!("{}{}", SECTION_ROUTE_PREFIX, slug))
    }
}

/// Fold already-loaded lists into routes: every entry's `endpoint` in list
/// then entry order, followed by one route per distinct section.
pub fn derive_from_lists(lists: &[Vec<Entry>]) -> Vec<String> {
    let mut sections = SectionSet::new();
    let mut routes = Vec::with_capacity(lists.iter().map(Vec::len).sum());

    for list in lists {
        for entry in list {
            sections.insert(entry.section_slug());
            routes.push(entry.endpoint().to_string());
        }
    }

    routes.extend(sections.routes());
    routes
}

/// Read every materialized list back from disk and derive the routes to
/// pre-render.
///
/// Fails if a list file is missing or malformed, or if any entry lacks
/// `slug`, `endpoint` or `section.slug`.
pub async fn derive_routes(root: &Path, targets: &[ListTarget]) -> Result<Vec<String>> {
    let lists = try_join_all(targets.iter().map(|target| load_list(root, target))).await?;
    let routes = derive_from_lists(&lists);

    info!(lists = lists.len(), routes = routes.len(), "Derived routes");
    Ok(routes)
}

/// Load one materialized list, checking each entry's shape
pub async fn load_list(root: &Path, target: &ListTarget) -> Result<Vec<Entry>> {
    let path = root.join(&target.path);
    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| Error::io(&path, e))?;

    let raw: Vec<Value> = serde_json::from_str(&content).map_err(|source| Error::Parse {
        path: path.clone(),
        source,
    })?;

    let entries = raw
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<Entry>(value).map_err(|e| Error::Shape {
                path: path.clone(),
                index,
                message: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(kind = %target.kind, entries = entries.len(), "Loaded list");
    Ok(entries)
}
