//! CLI module graph.

pub mod command;
pub mod config;
pub mod covariance;
pub mod output;
pub mod parlay;
pub mod size;

use std::path::Path;

use crate::domain::BetId;
use crate::error::Result;
use crate::infrastructure::config::slate::{LoadedSlate, Slate};

/// Load a slate file and build its graph, applying any recorded outcomes.
pub(crate) fn load_slate(path: &Path) -> Result<LoadedSlate> {
    let loaded = Slate::load(path)?.into_graph()?;
    if !output::is_json() {
        for (bet_id, report) in &loaded.settlements {
            output::note(&format!(
                "settled {bet_id}: {} updated, {} voided",
                report.updated.len(),
                report.voided.len()
            ));
        }
    }
    Ok(loaded)
}

/// Ids of the outcomes applied while loading, for JSON reports.
pub(crate) fn settled_ids(loaded: &LoadedSlate) -> Vec<&BetId> {
    loaded.settlements.iter().map(|(id, _)| id).collect()
}

/// Convert raw `--bets`/`--legs` values into ids.
pub(crate) fn bet_ids(raw: &[String]) -> Vec<BetId> {
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(BetId::from)
        .collect()
}
