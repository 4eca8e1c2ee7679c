//! Handler for the `config` command group.

use std::path::Path;

use serde_json::json;

use super::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Execute `config validate`.
///
/// `config` was loaded from `path`, and loading validates, so reaching the
/// report means the file is good.
pub fn execute_validate(path: &Path, config: &Config) -> Result<()> {
    let limits = &config.risk;
    let backend = config.optimizer()?.solver_name().unwrap_or("none");

    if output::is_json() {
        output::json_output(&json!({
            "command": "config.validate",
            "path": path.display().to_string(),
            "valid": true,
            "solver": backend,
        }));
        return Ok(());
    }

    output::section("Config Validation");
    output::success("Configuration is valid");
    output::field("Path", path.display());
    output::field("Bankroll", limits.bankroll);
    output::field("Max exposure", output::percent(limits.max_exposure));
    output::field("Max single bet", output::percent(limits.max_single_bet));
    match limits.max_event_exposure {
        Some(cap) => output::field("Max per event", output::percent(cap)),
        None => output::field("Max per event", "1.2x single-bet cap"),
    }
    output::field("Min edge", output::percent(limits.min_edge));
    output::field("Solver", backend);
    Ok(())
}
