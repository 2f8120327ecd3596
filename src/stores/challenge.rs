//! Defines the savings challenge store trait.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{DatabaseID, NewChallenge, SavingsChallenge},
};

/// The result of adding progress to a savings challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// The amount saved after the update.
    pub progress: f64,
    /// The challenge's goal amount.
    pub goal_amount: f64,
    /// Whether the challenge stands completed after the update.
    ///
    /// Completion latches: once true it stays true, and updates past an
    /// already-met goal still report `true`.
    pub completed: bool,
}

/// Handles the creation, retrieval, and progress tracking of savings
/// challenges.
pub trait ChallengeStore {
    /// Create a new savings challenge with zero progress.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the goal amount is not positive, or
    /// [Error::EmptyChallengeTitle] if the title is empty.
    fn create(&mut self, new_challenge: NewChallenge) -> Result<SavingsChallenge, Error>;

    /// Retrieve all challenges belonging to `email`.
    fn get_by_email(&self, email: &str) -> Result<Vec<SavingsChallenge>, Error>;

    /// Delete the challenge with `challenge_id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingChallenge] if no challenge has the given
    /// ID.
    fn delete(&mut self, challenge_id: DatabaseID) -> Result<(), Error>;

    /// Add `amount` to the challenge's progress, latching the completed flag
    /// if the goal is reached.
    ///
    /// The increment and the completion check execute as one atomic unit, so
    /// two concurrent small updates cannot both miss the threshold crossing.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `amount` is not positive, and
    /// [Error::NotFound] if no challenge has the given ID.
    fn update_progress(
        &mut self,
        challenge_id: DatabaseID,
        amount: f64,
    ) -> Result<ProgressUpdate, Error>;
}
