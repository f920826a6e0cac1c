//! `tg entities`: extract entities from triples and rank them by criticality.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use topograph_analysis::betweenness_centrality;
use topograph_analysis::score::{
    EntityCriticalityResult, filter_critical_entities, score_entities, sort_by_criticality,
};
use topograph_core::config::EntitiesConfig;
use topograph_core::{KnowledgeGraph, extract_entities_from_eavs};
use tracing::debug;

use crate::cmd::{load_triple_file, project_config};
use crate::output::{OutputMode, fmt_score, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Arguments for `tg entities`.
#[derive(Args, Debug)]
pub struct EntitiesArgs {
    /// Semantic triples JSON array.
    pub triples: PathBuf,

    /// Name of the central entity (case-insensitive).
    #[arg(long)]
    pub central: Option<String>,

    /// Subject label of a core-section topic (repeatable).
    #[arg(long = "core-topic", value_name = "TOPIC")]
    pub core_topics: Vec<String>,

    /// Only list entities at or above the criticality threshold.
    #[arg(long)]
    pub critical_only: bool,
}

impl EntitiesArgs {
    /// Flags win; otherwise fall back to the project config.
    fn central_entity(&self, config: &EntitiesConfig) -> String {
        self.central
            .clone()
            .or_else(|| config.central_entity.clone())
            .unwrap_or_default()
    }

    fn core_topics<'a>(&'a self, config: &'a EntitiesConfig) -> &'a [String] {
        if self.core_topics.is_empty() {
            &config.core_topics
        } else {
            &self.core_topics
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntitiesReport {
    central_entity: Option<String>,
    entity_count: usize,
    critical_count: usize,
    entities: Vec<EntityCriticalityResult>,
}

/// Execute `tg entities`.
///
/// Centrality comes from the graph the triples themselves describe.
///
/// # Errors
///
/// Returns an error if the triples or project config cannot be loaded.
pub fn run_entities(
    args: &EntitiesArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let config = project_config(output, project_root)?;
    let triples = load_triple_file(&args.triples, output, project_root)?;

    let central = args.central_entity(&config.entities);
    let records =
        extract_entities_from_eavs(&triples, &central, args.core_topics(&config.entities));
    let centrality = betweenness_centrality(&KnowledgeGraph::from_triples(&triples));

    let scored = sort_by_criticality(&score_entities(&records, &centrality));
    let entity_count = scored.len();
    let critical_count = scored.iter().filter(|r| r.is_critical).count();
    let entities = if args.critical_only {
        filter_critical_entities(&scored)
    } else {
        scored
    };
    debug!(entity_count, critical_count, "ranked entities");

    let report = EntitiesReport {
        central_entity: Some(central).filter(|c| !c.trim().is_empty()),
        entity_count,
        critical_count,
        entities,
    };

    render_mode(
        output,
        &report,
        |r, w| {
            for e in &r.entities {
                let marker = if e.is_critical { "critical" } else { "-" };
                writeln!(w, "{}  {:.2}  {}", e.entity_name, e.score, marker)?;
            }
            Ok(())
        },
        |r, w| {
            pretty_section(w, "Entity criticality")?;
            pretty_kv(w, "Central entity", r.central_entity.as_deref().unwrap_or("(none)"))?;
            pretty_kv(w, "Entities", r.entity_count.to_string())?;
            pretty_kv(w, "Critical", r.critical_count.to_string())?;
            pretty_rule(w)?;
            if r.entities.is_empty() {
                writeln!(w, "No entities.")?;
                return Ok(());
            }
            let width = r
                .entities
                .iter()
                .map(|e| e.entity_name.chars().count())
                .max()
                .unwrap_or(0)
                .max(6);
            writeln!(w, "{:<width$}  {:>5}  {:>6}  {:>6}", "ENTITY", "SCORE", "BASE", "BRIDGE")?;
            for e in &r.entities {
                let flag = if e.is_critical { " *" } else { "" };
                writeln!(
                    w,
                    "{:<width$}  {:>5.2}  {:>6.2}  {:>6}{flag}",
                    e.entity_name,
                    e.score,
                    e.breakdown.base_weight,
                    fmt_score(e.breakdown.bridge_bonus),
                )?;
            }
            Ok(())
        },
    )
}
