//! Handler for the `covariance` command.

use serde_json::json;

use super::command::CovarianceArgs;
use super::{bet_ids, load_slate, output, settled_ids};
use crate::domain::CovarianceMatrix;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Execute `covariance`.
///
/// Prints the raw matrix built from the slate's conditional structure,
/// before any positive semi-definite correction.
pub fn execute(_config: &Config, args: &CovarianceArgs) -> Result<()> {
    let loaded = load_slate(&args.slate)?;
    let ids = match bet_ids(&args.bets) {
        ids if ids.is_empty() => loaded.graph.bet_ids(),
        ids => ids,
    };
    let matrix = loaded.graph.covariance_matrix(&ids)?;

    if output::is_json() {
        output::json_output(&json!({
            "command": "covariance",
            "settled": settled_ids(&loaded),
            "bets": matrix.ids(),
            "matrix": matrix.rows(),
            "min_eigenvalue": finite_or_null(matrix.min_eigenvalue()),
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Covariance");
    if matrix.is_empty() {
        output::note("no bets selected");
        return Ok(());
    }

    print_matrix(&matrix);
    let min = matrix.min_eigenvalue();
    output::field("Min eigenvalue", format!("{min:.6}"));
    if min < 0.0 {
        output::warning("matrix is not positive semi-definite; sizing applies an eigenvalue floor");
    }
    Ok(())
}

fn print_matrix(matrix: &CovarianceMatrix) {
    let mut header = vec![String::new()];
    header.extend(matrix.ids().iter().map(ToString::to_string));

    let rows = matrix
        .ids()
        .iter()
        .zip(matrix.rows())
        .map(|(id, row)| {
            let mut cells = vec![id.to_string()];
            cells.extend(row.iter().map(|v| format!("{v:.4}")));
            cells
        })
        .collect();

    output::grid(header, rows);
}

fn finite_or_null(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
