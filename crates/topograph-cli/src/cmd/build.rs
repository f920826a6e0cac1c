//! `tg build`: turn a semantic triple array into a graph snapshot.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use topograph_core::KnowledgeGraph;
use tracing::info;

use crate::cmd::load_triple_file;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `tg build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Semantic triples JSON array.
    pub triples: PathBuf,

    /// Write the snapshot here instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Summary printed when the snapshot goes to a file.
#[derive(Debug, Serialize)]
struct BuildSummary {
    out: String,
    node_count: usize,
    edge_count: usize,
    content_hash: String,
}

/// Execute `tg build`.
///
/// Without `--out` the snapshot JSON is the command's output regardless of
/// the output mode, so it can be piped into the analysis commands.
///
/// # Errors
///
/// Returns an error if the triples cannot be loaded or the snapshot cannot
/// be written.
pub fn run_build(args: &BuildArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let triples = load_triple_file(&args.triples, output, project_root)?;
    let graph = KnowledgeGraph::from_triples(&triples);
    let json = graph.to_json().context("failed to serialize graph snapshot")?;

    let Some(out) = args.out.as_ref() else {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        writeln!(lock, "{json}")?;
        return Ok(());
    };

    let out_path = if out.is_absolute() {
        out.clone()
    } else {
        project_root.join(out)
    };
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&out_path, format!("{json}\n"))
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    info!(path = %out_path.display(), "wrote graph snapshot");

    let summary = BuildSummary {
        out: out_path.display().to_string(),
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        content_hash: graph.content_hash(),
    };

    render_mode(
        output,
        &summary,
        |s, w| {
            writeln!(
                w,
                "{}  nodes={}  edges={}  {}",
                s.out, s.node_count, s.edge_count, s.content_hash
            )
        },
        |s, w| {
            pretty_section(w, "Graph snapshot")?;
            pretty_kv(w, "Written to", &s.out)?;
            pretty_kv(w, "Nodes", s.node_count.to_string())?;
            pretty_kv(w, "Edges", s.edge_count.to_string())?;
            pretty_kv(w, "Content hash", &s.content_hash)
        },
    )
}
