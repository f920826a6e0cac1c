pub mod build;
pub mod centrality;
pub mod completions;
pub mod entities;
pub mod holes;
pub mod report;

use std::path::{Path, PathBuf};

use clap::Args;
use topograph_core::{
    KnowledgeGraph, SemanticTriple, TopographError, load_snapshot, load_triples,
};
use topograph_core::config::{ProjectConfig, load_project_config};
use tracing::debug;

use crate::output::{CliError, OutputMode, render_error};

/// Graph input shared by the analysis commands.
#[derive(Args, Debug, Clone)]
pub struct GraphInput {
    /// Graph snapshot JSON (`{"nodes": [...], "edges": [...]}`).
    pub path: PathBuf,

    /// Treat the input as a semantic triple array instead of a snapshot.
    #[arg(long)]
    pub triples: bool,
}

/// Resolve `path` against the project root unless it is absolute.
fn resolve(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

/// Render a library error in the active mode and convert it for `main`.
fn fail(output: OutputMode, err: &TopographError) -> anyhow::Error {
    if let Err(render_err) = render_error(output, &CliError::from(err)) {
        return render_err;
    }
    anyhow::anyhow!("{err}")
}

/// Load the graph named by `input`, building it from triples when asked.
pub fn load_graph(
    input: &GraphInput,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<KnowledgeGraph> {
    let path = resolve(project_root, &input.path);
    let graph = if input.triples {
        load_triples(&path).map(|triples| KnowledgeGraph::from_triples(&triples))
    } else {
        load_snapshot(&path)
    }
    .map_err(|e| fail(output, &e))?;

    debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}

/// Load a semantic triple array from `path`.
pub fn load_triple_file(
    path: &Path,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<Vec<SemanticTriple>> {
    let path = resolve(project_root, path);
    let triples = load_triples(&path).map_err(|e| fail(output, &e))?;
    debug!(path = %path.display(), triples = triples.len(), "loaded triples");
    Ok(triples)
}

/// Load `.topograph/config.toml`, rendering parse failures.
pub fn project_config(output: OutputMode, project_root: &Path) -> anyhow::Result<ProjectConfig> {
    load_project_config(project_root).map_err(|e| fail(output, &e))
}
