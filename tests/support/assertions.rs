use rust_decimal::Decimal;

use betgraph::domain::{AllocationPlan, RiskLimits};

pub const EPS: f64 = 1e-9;

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

pub fn assert_decimal_near(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}

/// Every allocation within the single-bet cap and the total within exposure.
pub fn assert_within_limits(plan: &AllocationPlan, limits: &RiskLimits) {
    for (bet_id, allocation) in &plan.allocations {
        assert!(
            allocation.fraction >= 0.0 && allocation.fraction <= limits.single_cap() + EPS,
            "{bet_id} allocated {} above cap {}",
            allocation.fraction,
            limits.single_cap()
        );
    }
    assert!(
        plan.total_fraction() <= limits.max_exposure + EPS,
        "total {} above exposure cap {}",
        plan.total_fraction(),
        limits.max_exposure
    );
}
