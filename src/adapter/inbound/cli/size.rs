//! Handler for the `size` command.

use serde_json::json;
use tabled::Tabled;

use super::command::SizeArgs;
use super::{bet_ids, load_slate, output, settled_ids};
use crate::domain::{AllocationPlan, SizingMethod};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Bet")]
    bet: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Odds")]
    odds: String,
    #[tabled(rename = "Eff. Prob")]
    effective_prob: String,
    #[tabled(rename = "Edge")]
    edge: String,
    #[tabled(rename = "Fraction")]
    fraction: String,
    #[tabled(rename = "Stake")]
    stake: String,
}

/// Execute `size`.
pub fn execute(config: &Config, args: &SizeArgs) -> Result<()> {
    let loaded = load_slate(&args.slate)?;
    let optimizer = config.optimizer()?;
    let subset = bet_ids(&args.bets);
    let plan = optimizer.optimize(
        &loaded.graph,
        (!subset.is_empty()).then_some(subset.as_slice()),
    )?;

    if output::is_json() {
        output::json_output(&json!({
            "command": "size",
            "bankroll": optimizer.limits().bankroll,
            "settled": settled_ids(&loaded),
            "plan": plan,
            "total_fraction": plan.total_fraction(),
            "total_stake": plan.total_stake(),
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Allocation");
    output::field("Method", describe_method(&plan.method));
    output::field("Bankroll", optimizer.limits().bankroll);
    output::field("Candidates", plan.candidates.len());

    if plan.is_empty() {
        output::note("no bet received an allocation");
        return Ok(());
    }

    let rows = plan.allocations.iter().filter_map(|(bet_id, allocation)| {
        let bet = loaded.graph.bet(bet_id)?;
        Some(AllocationRow {
            bet: bet_id.to_string(),
            event: bet.event_id().to_string(),
            odds: format!("{:.2}", bet.decimal_odds()),
            effective_prob: output::percent(bet.effective_prob()),
            edge: output::signed(bet.edge(), output::percent(bet.edge())),
            fraction: output::percent(allocation.fraction),
            stake: allocation.stake.to_string(),
        })
    });
    output::table(rows.collect::<Vec<_>>());

    print_totals(&plan);
    if plan.method.is_fallback() {
        output::warning("sizing fell back to fractional Kelly; covariance was ignored");
    }
    Ok(())
}

fn print_totals(plan: &AllocationPlan) {
    output::field("Total fraction", output::percent(plan.total_fraction()));
    output::field("Total stake", output::highlight(plan.total_stake()));
}

fn describe_method(method: &SizingMethod) -> String {
    match method {
        SizingMethod::NoCandidates => "no candidates".to_string(),
        SizingMethod::Convex {
            iterations,
            converged,
        } => {
            let status = if *converged { "converged" } else { "iteration limit" };
            format!("growth optimization ({iterations} iterations, {status})")
        }
        SizingMethod::FractionalKelly { reason } => format!("fractional Kelly ({reason})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_each_method() {
        assert_eq!(describe_method(&SizingMethod::NoCandidates), "no candidates");
        assert_eq!(
            describe_method(&SizingMethod::Convex {
                iterations: 12,
                converged: true
            }),
            "growth optimization (12 iterations, converged)"
        );
        assert_eq!(
            describe_method(&SizingMethod::FractionalKelly {
                reason: "no solver backend configured".to_string()
            }),
            "fractional Kelly (no solver backend configured)"
        );
    }
}
