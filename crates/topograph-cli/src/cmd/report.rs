//! `tg report`: stats, centrality, and holes for one graph.

use std::io::Write;
use std::path::Path;

use clap::Args;
use topograph_analysis::GraphReport;

use crate::cmd::holes::{HoleOverrides, write_hole_text, write_holes_pretty};
use crate::cmd::{GraphInput, load_graph, project_config};
use crate::output::{OutputMode, fmt_score, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Most central vertices listed in human output.
const TOP_CENTRAL: usize = 10;

/// Arguments for `tg report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: GraphInput,

    #[command(flatten)]
    pub overrides: HoleOverrides,
}

/// Execute `tg report`.
///
/// # Errors
///
/// Returns an error if the graph or project config cannot be loaded.
pub fn run_report(args: &ReportArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let config = args.overrides.resolve(&project_config(output, project_root)?);
    let graph = load_graph(&args.input, output, project_root)?;
    let report = GraphReport::build(&graph, &config);

    render_mode(
        output,
        &report,
        |r, w| {
            let s = &r.stats;
            writeln!(
                w,
                "vertices={} nodes={} links={} edges={} components={} isolated={} density={} max_degree={} holes={}",
                s.vertex_count,
                s.node_count,
                s.link_count,
                s.edge_count,
                s.component_count,
                s.isolated_vertex_count,
                fmt_score(s.density),
                s.max_degree,
                r.holes.len(),
            )?;
            for hole in &r.holes {
                write_hole_text(w, hole)?;
            }
            Ok(())
        },
        |r, w| {
            let s = &r.stats;
            pretty_section(w, "Graph")?;
            pretty_kv(w, "Vertices", s.vertex_count.to_string())?;
            pretty_kv(w, "Nodes", s.node_count.to_string())?;
            pretty_kv(w, "Links", s.link_count.to_string())?;
            pretty_kv(w, "Edges", s.edge_count.to_string())?;
            pretty_kv(w, "Density", fmt_score(s.density))?;
            pretty_kv(w, "Components", s.component_count.to_string())?;
            pretty_kv(w, "Isolated", s.isolated_vertex_count.to_string())?;
            pretty_kv(w, "Max degree", s.max_degree.to_string())?;
            pretty_kv(w, "Content hash", &s.content_hash)?;
            writeln!(w)?;

            pretty_section(w, "Most central")?;
            let mut central: Vec<(&String, &f64)> =
                r.centrality.iter().filter(|(_, v)| **v > 0.0).collect();
            central.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
            if central.is_empty() {
                writeln!(w, "No vertex lies between others.")?;
            }
            for (id, score) in central.into_iter().take(TOP_CENTRAL) {
                pretty_kv(w, id, fmt_score(*score))?;
            }
            pretty_rule(w)?;
            writeln!(w)?;

            pretty_section(w, &format!("Structural holes (threshold {})", config.threshold))?;
            write_holes_pretty(w, &r.holes)
        },
    )
}
