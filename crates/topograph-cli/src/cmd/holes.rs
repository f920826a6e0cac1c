//! `tg holes`: weakly connected cluster pairs and who could bridge them.

use std::io::Write;
use std::path::Path;

use clap::Args;
use topograph_analysis::{HoleConfig, StructuralHole, identify_structural_holes_with};
use topograph_core::config::ProjectConfig;

use crate::cmd::{GraphInput, load_graph, project_config};
use crate::output::{OutputMode, fmt_score, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Hole-detection overrides shared by `tg holes` and `tg report`.
#[derive(Args, Debug, Clone, Default)]
pub struct HoleOverrides {
    /// Report cluster pairs whose connection strength is below this.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Maximum bridge candidates listed per hole.
    #[arg(long)]
    pub max_candidates: Option<usize>,

    /// Smallest cluster a weak cut may separate.
    #[arg(long)]
    pub min_cluster_size: Option<usize>,
}

impl HoleOverrides {
    /// Project config values with any flags applied on top.
    pub fn resolve(&self, config: &ProjectConfig) -> HoleConfig {
        let mut resolved = HoleConfig::from(&config.holes);
        if let Some(threshold) = self.threshold {
            resolved.threshold = threshold;
        }
        if let Some(max) = self.max_candidates {
            resolved.max_bridge_candidates = max;
        }
        if let Some(min) = self.min_cluster_size {
            resolved.min_cluster_size = min;
        }
        resolved
    }
}

/// Arguments for `tg holes`.
#[derive(Args, Debug)]
pub struct HolesArgs {
    #[command(flatten)]
    pub input: GraphInput,

    #[command(flatten)]
    pub overrides: HoleOverrides,
}

/// Execute `tg holes`.
///
/// # Errors
///
/// Returns an error if the graph or project config cannot be loaded.
pub fn run_holes(args: &HolesArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let config = args.overrides.resolve(&project_config(output, project_root)?);
    let graph = load_graph(&args.input, output, project_root)?;
    let holes = identify_structural_holes_with(&graph, &config);

    render_mode(
        output,
        &holes,
        |holes, w| {
            for hole in holes {
                write_hole_text(w, hole)?;
            }
            Ok(())
        },
        |holes, w| {
            pretty_section(w, &format!("Structural holes (threshold {})", config.threshold))?;
            write_holes_pretty(w, holes)
        },
    )
}

/// One line per hole: priority, strength, both clusters, candidates.
pub fn write_hole_text(w: &mut dyn Write, hole: &StructuralHole) -> std::io::Result<()> {
    writeln!(
        w,
        "{}  {}  [{}] | [{}]  bridges: {}",
        hole.priority,
        fmt_score(hole.connection_strength),
        hole.cluster_a.join(","),
        hole.cluster_b.join(","),
        hole.bridge_candidates.join(",")
    )
}

/// Sectioned pretty listing of holes.
pub fn write_holes_pretty(w: &mut dyn Write, holes: &[StructuralHole]) -> std::io::Result<()> {
    if holes.is_empty() {
        writeln!(w, "No structural holes found.")?;
        return Ok(());
    }
    for (i, hole) in holes.iter().enumerate() {
        writeln!(w, "#{} [{}]", i + 1, hole.priority)?;
        pretty_kv(w, "Strength", fmt_score(hole.connection_strength))?;
        pretty_kv(w, "Cluster A", summarize(&hole.cluster_a))?;
        pretty_kv(w, "Cluster B", summarize(&hole.cluster_b))?;
        pretty_kv(w, "Bridges", hole.bridge_candidates.join(", "))?;
        pretty_rule(w)?;
    }
    Ok(())
}

const CLUSTER_PREVIEW: usize = 8;

fn summarize(ids: &[String]) -> String {
    if ids.len() <= CLUSTER_PREVIEW {
        return ids.join(", ");
    }
    format!(
        "{}, … (+{} more)",
        ids[..CLUSTER_PREVIEW].join(", "),
        ids.len() - CLUSTER_PREVIEW
    )
}
