//! This file defines the `CreditScoreRecord` type, the persisted form of the
//! derived credit score.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::models::{DatabaseID, UserID};

/// The current derived credit score for a user.
///
/// At most one record exists per user: every recomputation overwrites the score
/// and report date in place. Score history is deliberately out of scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditScoreRecord {
    /// The ID for the record.
    pub id: DatabaseID,
    /// The ID of the user the score belongs to.
    pub user_id: UserID,
    /// The score, bounded to the closed interval [300, 850].
    pub score: i64,
    /// The date the score was last recomputed.
    pub report_date: Date,
    /// The credit bureau the score is attributed to, if any.
    pub provider: Option<String>,
}
