//! Handler for the `parlay` command.

use serde_json::json;

use super::command::ParlayArgs;
use super::{bet_ids, load_slate, output, settled_ids};
use crate::domain::{ParlayValuation, Recommendation};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Execute `parlay`.
pub fn execute(config: &Config, args: &ParlayArgs) -> Result<()> {
    let loaded = load_slate(&args.slate)?;
    let legs = bet_ids(&args.legs);
    let valuation = config
        .optimizer()?
        .compute_parlay_value(&loaded.graph, &legs)?;

    if output::is_json() {
        output::json_output(&json!({
            "command": "parlay",
            "settled": settled_ids(&loaded),
            "valuation": valuation,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    print_valuation(&valuation);
    Ok(())
}

fn print_valuation(v: &ParlayValuation) {
    let legs: Vec<String> = v.leg_ids.iter().map(ToString::to_string).collect();

    output::section("Parlay");
    output::field("Legs", legs.join(" + "));
    output::field("Odds", format!("{:.3}", v.parlay_odds));

    output::section("Probability");
    output::field("True", output::percent(v.true_probability));
    output::field("Naive", output::percent(v.naive_probability));
    output::field(
        "Correlation",
        output::signed(
            v.correlation_adjustment,
            output::percent(v.correlation_adjustment),
        ),
    );
    output::field("Market implied", output::percent(v.market_implied_prob));

    output::section("Value");
    output::field("Edge", output::signed(v.edge, output::percent(v.edge)));
    output::field(
        "Expected value",
        output::signed(v.expected_value, format!("{:+.4}", v.expected_value)),
    );
    match v.recommendation {
        Recommendation::Bet => output::success("BET: edge clears the minimum"),
        Recommendation::Pass => output::note("PASS: edge below the minimum"),
    }
}
