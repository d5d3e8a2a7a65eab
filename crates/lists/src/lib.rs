// List materialization: build each configured list, persist it as JSON,
// then read it back to prove the file on disk is what downstream will load.

pub mod source;

use async_trait::async_trait;
use futures::future::try_join_all;
use prerender_kit_core::{Entry, Error, ListConfig, ListKind, ListTarget, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

pub use source::{JsonFileBuilder, TomlDirBuilder};

/// Produces the entries of one list. The data source behind it is opaque.
#[async_trait]
pub trait ListBuilder: Send + Sync {
    async fn build(&self) -> anyhow::Result<Vec<Entry>>;
}

/// Adapts an async closure into a [`ListBuilder`]
pub struct FnBuilder<F>(F);

impl<F> FnBuilder<F> {
    pub fn new<Fut>(f: F) -> Self
    where
        F: Fn() -> Fut,
        Fut: Future<Output = anyhow::Result<Vec<Entry>>>,
    {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> ListBuilder for FnBuilder<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Vec<Entry>>> + Send,
{
    async fn build(&self) -> anyhow::Result<Vec<Entry>> {
        (self.0)().await
    }
}

/// A list target bound to the builder that fills it
#[derive(Clone)]
pub struct ListSpec {
    pub target: ListTarget,
    pub builder: Arc<dyn ListBuilder>,
}

impl ListSpec {
    pub fn new(target: ListTarget, builder: impl ListBuilder + 'static) -> Self {
        Self {
            target,
            builder: Arc::new(builder),
        }
    }

    /// Bind a configured list to a builder for its source, resolving source
    /// paths against the project root
    pub fn from_config(root: &Path, config: &ListConfig) -> Self {
        Self {
            target: config.target.clone(),
            builder: source::builder_for(root, &config.target.kind, &config.source),
        }
    }

    pub fn kind(&self) -> &ListKind {
        &self.target.kind
    }
}

impl fmt::Debug for ListSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSpec")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// A list as it was read back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedList {
    pub kind: ListKind,
    /// Absolute or root-joined destination path
    pub path: PathBuf,
    pub entries: Vec<Entry>,
    /// SHA-256 of the bytes written, lowercase hex
    pub digest: String,
}

/// Host build lifecycle points that trigger materialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    BeforeBuild,
    BeforeGenerate,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::BeforeBuild => f.write_str("before-build"),
            Hook::BeforeGenerate => f.write_str("before-generate"),
        }
    }
}

/// Run materialization on behalf of a host hook
pub async fn run_hook(
    hook: Hook,
    root: &Path,
    specs: &[ListSpec],
) -> Result<Vec<MaterializedList>> {
    info!(%hook, "Running hook");
    materialize_all(root, specs).await
}

/// Build, persist and verify every list.
///
/// Lists are processed concurrently on the calling task. The result keeps the
/// order of `specs`. The first failure fails the whole batch.
pub async fn materialize_all(root: &Path, specs: &[ListSpec]) -> Result<Vec<MaterializedList>> {
    info!("Build Lists started");

    let lists = try_join_all(specs.iter().map(|spec| materialize_one(root, spec))).await?;

    info!("Build Lists finished");
    Ok(lists)
}

async fn materialize_one(root: &Path, spec: &ListSpec) -> Result<MaterializedList> {
    let kind = spec.kind();

    let entries = spec.builder.build().await.map_err(|source| Error::Builder {
        kind: kind.clone(),
        source,
    })?;
    debug!(%kind, entries = entries.len(), "Built list");

    let json = serde_json::to_string(&entries).map_err(|source| Error::Serialize {
        kind: kind.clone(),
        source,
    })?;

    let path = root.join(&spec.target.path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent, e))?;
    }

    // Plain overwrite: a crash mid-write leaves a truncated file behind
    fs::write(&path, json.as_bytes())
        .await
        .map_err(|e| Error::io(&path, e))?;

    let saved = fs::read_to_string(&path)
        .await
        .map_err(|e| Error::io(&path, e))?;
    let entries = verify_saved(&path, &json, &saved)?;
    let digest = format!("{:x}", Sha256::digest(saved.as_bytes()));
    debug!(%kind, path = %path.display(), %digest, "Saved list");

    Ok(MaterializedList {
        kind: kind.clone(),
        path,
        entries,
        digest,
    })
}

/// Check that the text read back is exactly what was written, then parse it
fn verify_saved(path: &Path, written: &str, saved: &str) -> Result<Vec<Entry>> {
    if saved != written {
        return Err(Error::ReadBackMismatch {
            path: path.to_path_buf(),
        });
    }

    serde_json::from_str(saved).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}
