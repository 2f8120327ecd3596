//! The scoring engine: a pure, deterministic mapping from ledger aggregates to
//! a bounded credit score and advisory tips.
//!
//! The score is modeled as an ordered list of independent adjustment rules
//! applied to a running total, rather than nested conditionals, so each rule
//! can be tested on its own. The engine holds no state: every call replaces the
//! prior score in full from the current aggregate snapshot.

mod tips;

pub use tips::{Tip, advisory_tips};

use serde::{Deserialize, Serialize};

/// The score every recomputation starts from.
pub const BASE_SCORE: f64 = 700.0;

/// The lowest score the engine can report.
pub const MIN_SCORE: i64 = 300;

/// The highest score the engine can report.
pub const MAX_SCORE: i64 = 850;

/// The utilization percentage at or above which the heavy-usage penalty
/// applies.
const HIGH_UTILIZATION_THRESHOLD: f64 = 80.0;

/// The utilization percentage at or above which usage stops earning a bonus.
const MODERATE_UTILIZATION_THRESHOLD: f64 = 40.0;

/// A read-only aggregate view of a user's ledger, the sole input to the
/// scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aggregates {
    /// The sum of all positive transaction amounts ever posted.
    pub income_total: f64,
    /// The sum of the magnitudes of all negative transaction amounts ever
    /// posted. Always non-negative.
    pub expense_total: f64,
    /// The sum of the balances across all of the user's accounts.
    pub balance_total: f64,
    /// The sum of the credit limits across all of the user's accounts.
    pub credit_limit_total: f64,
}

impl Aggregates {
    /// Credit utilization as a percentage of the total credit limit.
    ///
    /// Returns `None` when the user has no credit limit set, in which case
    /// utilization is undefined: the scoring rules treat it as zero while the
    /// advisory rules ask the user to set a limit instead.
    pub fn utilization(&self) -> Option<f64> {
        (self.credit_limit_total > 0.0)
            .then(|| self.expense_total / self.credit_limit_total * 100.0)
    }
}

/// A single scoring rule: a pure function from aggregates to a score
/// adjustment.
type AdjustmentRule = fn(&Aggregates) -> f64;

/// The rules applied, in order, to the base score. The rules are independent:
/// each one inspects the aggregates on its own and their adjustments add up.
const ADJUSTMENT_RULES: [AdjustmentRule; 3] = [
    utilization_adjustment,
    spending_ratio_adjustment,
    positive_balance_bonus,
];

/// Penalize heavy credit utilization and reward light utilization.
///
/// Undefined utilization (no credit limit) counts as zero here and lands in
/// the light-usage band.
fn utilization_adjustment(aggregates: &Aggregates) -> f64 {
    match aggregates.utilization().unwrap_or(0.0) {
        utilization if utilization >= HIGH_UTILIZATION_THRESHOLD => -20.0,
        utilization if utilization >= MODERATE_UTILIZATION_THRESHOLD => -10.0,
        _ => 10.0,
    }
}

/// Penalize spending beyond income and reward saving at least half of it.
fn spending_ratio_adjustment(aggregates: &Aggregates) -> f64 {
    if aggregates.expense_total > aggregates.income_total {
        -10.0
    } else if aggregates.income_total > 0.0
        && aggregates.expense_total < 0.5 * aggregates.income_total
    {
        10.0
    } else {
        0.0
    }
}

/// A small bonus for holding a positive overall balance.
fn positive_balance_bonus(aggregates: &Aggregates) -> f64 {
    if aggregates.balance_total > 0.0 { 5.0 } else { 0.0 }
}

/// Compute the credit score for an aggregate snapshot of a user's ledger.
///
/// Starts from [BASE_SCORE], applies every adjustment rule in order, then
/// truncates toward zero and clamps to `[MIN_SCORE, MAX_SCORE]`. Truncation
/// happens once at the end, not per rule.
///
/// The result is a pure function of the input: identical aggregates always
/// yield identical scores, with no memory of any score computed before.
pub fn compute_score(aggregates: &Aggregates) -> i64 {
    let total = ADJUSTMENT_RULES
        .iter()
        .fold(BASE_SCORE, |score, rule| score + rule(aggregates));

    (total as i64).clamp(MIN_SCORE, MAX_SCORE)
}

#[cfg(test)]
mod utilization_adjustment_tests {
    use super::{Aggregates, utilization_adjustment};

    fn aggregates_with_utilization(expense_total: f64, credit_limit_total: f64) -> Aggregates {
        Aggregates {
            expense_total,
            credit_limit_total,
            ..Default::default()
        }
    }

    #[test]
    fn heavy_utilization_is_penalized() {
        let aggregates = aggregates_with_utilization(80.0, 100.0);

        assert_eq!(utilization_adjustment(&aggregates), -20.0);
    }

    #[test]
    fn moderate_utilization_is_penalized() {
        let aggregates = aggregates_with_utilization(40.0, 100.0);

        assert_eq!(utilization_adjustment(&aggregates), -10.0);
    }

    #[test]
    fn light_utilization_earns_bonus() {
        let aggregates = aggregates_with_utilization(39.99, 100.0);

        assert_eq!(utilization_adjustment(&aggregates), 10.0);
    }

    #[test]
    fn undefined_utilization_counts_as_zero() {
        let aggregates = aggregates_with_utilization(500.0, 0.0);

        assert_eq!(utilization_adjustment(&aggregates), 10.0);
    }
}
