//! `tg centrality`: normalized betweenness per vertex.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;
use topograph_analysis::betweenness_centrality;

use crate::cmd::{GraphInput, load_graph};
use crate::output::{OutputMode, fmt_score, pretty_rule, pretty_section, render_mode};

/// Arguments for `tg centrality`.
#[derive(Args, Debug)]
pub struct CentralityArgs {
    #[command(flatten)]
    pub input: GraphInput,

    /// Show only the N most central vertices.
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralityEntry {
    pub id: String,
    pub score: f64,
}

/// Rank vertices by score, highest first; equal scores by id.
fn ranked(scores: &BTreeMap<String, f64>, top: Option<usize>) -> Vec<CentralityEntry> {
    let mut entries: Vec<CentralityEntry> = scores
        .iter()
        .map(|(id, score)| CentralityEntry {
            id: id.clone(),
            score: *score,
        })
        .collect();
    entries.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    if let Some(n) = top {
        entries.truncate(n);
    }
    entries
}

/// Execute `tg centrality`.
///
/// # Errors
///
/// Returns an error if the graph cannot be loaded or output fails.
pub fn run_centrality(
    args: &CentralityArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let graph = load_graph(&args.input, output, project_root)?;
    let entries = ranked(&betweenness_centrality(&graph), args.top);

    render_mode(
        output,
        &entries,
        |entries, w| {
            for e in entries {
                writeln!(w, "{}  {}", e.id, fmt_score(e.score))?;
            }
            Ok(())
        },
        |entries, w| {
            pretty_section(w, "Betweenness centrality")?;
            if entries.is_empty() {
                writeln!(w, "(empty graph)")?;
                return Ok(());
            }
            let width = entries.iter().map(|e| e.id.len()).max().unwrap_or(0).max(6);
            writeln!(w, "{:<width$}  {:>8}", "VERTEX", "SCORE")?;
            for e in entries {
                writeln!(w, "{:<width$}  {:>8}", e.id, fmt_score(e.score))?;
            }
            pretty_rule(w)
        },
    )
}
