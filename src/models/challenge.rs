//! This file defines the `SavingsChallenge` type, a savings goal a user works
//! towards with incremental progress updates.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::models::DatabaseID;

/// A savings goal with incremental progress and a terminal completed state.
///
/// Challenges are keyed by the owner's email rather than a user ID; the source
/// data model couples them loosely and that coupling is preserved here.
///
/// The completed flag latches: it becomes true the first time progress reaches
/// the goal amount and is never reset by further updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsChallenge {
    /// The ID for the challenge.
    pub id: DatabaseID,
    /// The email address of the user the challenge belongs to.
    pub user_email: String,
    /// A short description of the goal, e.g. "Save $200 this month".
    pub title: String,
    /// The amount of money to save.
    pub goal_amount: f64,
    /// The amount saved so far.
    pub progress: f64,
    /// When the challenge started, if set.
    pub start_date: Option<Date>,
    /// When the challenge ends, if set.
    pub end_date: Option<Date>,
    /// Whether progress has ever reached the goal amount.
    pub completed: bool,
}

/// The data required to create a new [SavingsChallenge].
#[derive(Debug, Clone, PartialEq)]
pub struct NewChallenge {
    /// The email address of the user the challenge belongs to.
    pub user_email: String,
    /// A short description of the goal.
    pub title: String,
    /// The amount of money to save, which must be positive.
    pub goal_amount: f64,
    /// When the challenge starts, if known.
    pub start_date: Option<Date>,
    /// When the challenge ends, if known.
    pub end_date: Option<Date>,
}
