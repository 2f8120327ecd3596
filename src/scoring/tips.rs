//! Advisory tips derived deterministically from ledger aggregates.
//!
//! The static advice catalog that supplements these tips with randomly drawn
//! entries lives in the advice store; everything here is a pure function of the
//! aggregates.

use serde::{Deserialize, Serialize};

use super::{Aggregates, MODERATE_UTILIZATION_THRESHOLD};

/// A short piece of financial advice shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    /// A short headline for the tip.
    pub title: String,
    /// The advice itself.
    pub content: String,
}

impl Tip {
    fn new(title: &str, content: String) -> Self {
        Self {
            title: title.to_string(),
            content,
        }
    }
}

/// Derive advisory tips from an aggregate snapshot of a user's ledger.
///
/// The output order is deterministic: the spending tip (if any) comes first and
/// the utilization tip second. When the user has no credit limit set,
/// utilization is undefined and the utilization tip is replaced with a nudge to
/// set a limit.
pub fn advisory_tips(aggregates: &Aggregates) -> Vec<Tip> {
    let mut tips = Vec::with_capacity(2);

    if let Some(tip) = spending_tip(aggregates) {
        tips.push(tip);
    }

    tips.push(utilization_tip(aggregates));

    tips
}

fn spending_tip(aggregates: &Aggregates) -> Option<Tip> {
    if aggregates.expense_total > aggregates.income_total {
        Some(Tip::new(
            "You're Overspending",
            "Your expenses exceed your income. Try to reduce non-essential costs.".to_string(),
        ))
    } else if aggregates.income_total > 0.0
        && aggregates.expense_total < 0.5 * aggregates.income_total
    {
        Some(Tip::new(
            "Excellent Saving Habits",
            "You're saving a good portion of your income. Consider investing to grow your wealth."
                .to_string(),
        ))
    } else {
        None
    }
}

fn utilization_tip(aggregates: &Aggregates) -> Tip {
    match aggregates.utilization() {
        Some(utilization) if utilization > MODERATE_UTILIZATION_THRESHOLD => Tip::new(
            "Higher Credit Usage",
            format!(
                "Your credit utilization is {utilization:.1}%. Try to keep it below 40% to \
                maintain a healthy score."
            ),
        ),
        Some(utilization) => Tip::new(
            "Good Credit Usage",
            format!("Your utilization is {utilization:.1}%. Great job keeping it under 40%!"),
        ),
        None => Tip::new(
            "Set Your Credit Limit",
            "We can give better insights once you set a credit limit for your account."
                .to_string(),
        ),
    }
}
