//! Implements a SQLite backed savings challenge store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, NewChallenge, SavingsChallenge},
    stores::challenge::{ChallengeStore, ProgressUpdate},
};

/// Stores savings challenges in a SQLite database.
///
/// Challenges reference their owner by email rather than user ID, so this
/// store has no dependency on the user table.
#[derive(Debug, Clone)]
pub struct SQLiteChallengeStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteChallengeStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLock)
    }
}

impl ChallengeStore for SQLiteChallengeStore {
    /// Create a new savings challenge with zero progress.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyChallengeTitle] if the title is empty,
    /// - [Error::InvalidAmount] if the goal amount is not positive,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, new_challenge: NewChallenge) -> Result<SavingsChallenge, Error> {
        if new_challenge.title.is_empty() {
            return Err(Error::EmptyChallengeTitle);
        }

        if new_challenge.goal_amount <= 0.0 {
            return Err(Error::InvalidAmount);
        }

        let challenge = self
            .lock()?
            .prepare(
                "INSERT INTO savings_challenge
                    (user_email, title, goal_amount, progress, start_date, end_date, completed)
                 VALUES (?1, ?2, ?3, 0, ?4, ?5, 0)
                 RETURNING id, user_email, title, goal_amount, progress, start_date, end_date,
                    completed",
            )?
            .query_row(
                (
                    &new_challenge.user_email,
                    &new_challenge.title,
                    new_challenge.goal_amount,
                    &new_challenge.start_date,
                    &new_challenge.end_date,
                ),
                Self::map_row,
            )?;

        Ok(challenge)
    }

    fn get_by_email(&self, email: &str) -> Result<Vec<SavingsChallenge>, Error> {
        self.lock()?
            .prepare(
                "SELECT id, user_email, title, goal_amount, progress, start_date, end_date,
                    completed
                 FROM savings_challenge WHERE user_email = :email",
            )?
            .query_map(&[(":email", &email)], Self::map_row)?
            .map(|maybe_challenge| maybe_challenge.map_err(Error::from))
            .collect()
    }

    /// Delete the challenge with `challenge_id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingChallenge] if no challenge has the given
    /// ID.
    fn delete(&mut self, challenge_id: DatabaseID) -> Result<(), Error> {
        let deleted = self.lock()?.execute(
            "DELETE FROM savings_challenge WHERE id = ?1",
            [challenge_id],
        )?;

        if deleted == 0 {
            Err(Error::DeleteMissingChallenge)
        } else {
            Ok(())
        }
    }

    /// Add `amount` to the challenge's progress, latching the completed flag
    /// when progress reaches the goal.
    ///
    /// The increment and the latch happen in a single UPDATE statement, so two
    /// concurrent updates cannot both observe the pre-increment progress and
    /// miss the threshold crossing. The flag only ever goes from unset to set;
    /// nothing resets it.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] if `amount` is not positive,
    /// - [Error::NotFound] if no challenge has the given ID,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update_progress(
        &mut self,
        challenge_id: DatabaseID,
        amount: f64,
    ) -> Result<ProgressUpdate, Error> {
        if amount <= 0.0 {
            return Err(Error::InvalidAmount);
        }

        let update = self
            .lock()?
            .prepare(
                "UPDATE savings_challenge
                 SET progress = progress + ?1,
                     completed = CASE WHEN progress + ?1 >= goal_amount THEN 1 ELSE completed END
                 WHERE id = ?2
                 RETURNING progress, goal_amount, completed",
            )?
            .query_row((amount, challenge_id), |row| {
                Ok(ProgressUpdate {
                    progress: row.get(0)?,
                    goal_amount: row.get(1)?,
                    completed: row.get(2)?,
                })
            })?;

        Ok(update)
    }
}

impl CreateTable for SQLiteChallengeStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS savings_challenge (
                    id INTEGER PRIMARY KEY,
                    user_email TEXT NOT NULL,
                    title TEXT NOT NULL,
                    goal_amount REAL NOT NULL,
                    progress REAL NOT NULL DEFAULT 0,
                    start_date TEXT,
                    end_date TEXT,
                    completed INTEGER NOT NULL DEFAULT 0
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteChallengeStore {
    type ReturnType = SavingsChallenge;

    fn map_row_with_offset(
        row: &rusqlite::Row,
        offset: usize,
    ) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(SavingsChallenge {
            id: row.get(offset)?,
            user_email: row.get(offset + 1)?,
            title: row.get(offset + 2)?,
            goal_amount: row.get(offset + 3)?,
            progress: row.get(offset + 4)?,
            start_date: row.get(offset + 5)?,
            end_date: row.get(offset + 6)?,
            completed: row.get(offset + 7)?,
        })
    }
}

#[cfg(test)]
mod sqlite_challenge_store_tests {
    use crate::{
        Error,
        models::NewChallenge,
        stores::{
            ChallengeStore,
            sqlite::{SQLAppState, create_app_state},
        },
    };

    fn get_app_state() -> SQLAppState {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        create_app_state(conn).unwrap()
    }

    fn test_challenge() -> NewChallenge {
        NewChallenge {
            user_email: "foo@bar.baz".to_string(),
            title: "Save $200 this month".to_string(),
            goal_amount: 200.0,
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn create_challenge_starts_with_zero_progress() {
        let mut state = get_app_state();

        let challenge = state.challenge_store.create(test_challenge()).unwrap();

        assert!(challenge.id > 0);
        assert_eq!(challenge.progress, 0.0);
        assert!(!challenge.completed);
    }

    #[test]
    fn create_challenge_fails_on_non_positive_goal() {
        let mut state = get_app_state();

        let result = state.challenge_store.create(NewChallenge {
            goal_amount: 0.0,
            ..test_challenge()
        });

        assert_eq!(result, Err(Error::InvalidAmount));
    }

    #[test]
    fn create_challenge_fails_on_empty_title() {
        let mut state = get_app_state();

        let result = state.challenge_store.create(NewChallenge {
            title: String::new(),
            ..test_challenge()
        });

        assert_eq!(result, Err(Error::EmptyChallengeTitle));
    }

    #[test]
    fn update_progress_below_goal_stays_active() {
        let mut state = get_app_state();
        let challenge = state.challenge_store.create(test_challenge()).unwrap();

        let update = state
            .challenge_store
            .update_progress(challenge.id, 50.0)
            .unwrap();

        assert_eq!(update.progress, 50.0);
        assert!(!update.completed);
    }

    #[test]
    fn update_progress_latches_completion_at_goal() {
        let mut state = get_app_state();
        let challenge = state.challenge_store.create(test_challenge()).unwrap();
        state
            .challenge_store
            .update_progress(challenge.id, 150.0)
            .unwrap();

        let update = state
            .challenge_store
            .update_progress(challenge.id, 50.0)
            .unwrap();

        assert!(update.completed, "progress reached the goal exactly");
    }

    #[test]
    fn completion_is_never_reset_by_further_updates() {
        let mut state = get_app_state();
        let challenge = state.challenge_store.create(test_challenge()).unwrap();
        let completed_update = state
            .challenge_store
            .update_progress(challenge.id, 250.0)
            .unwrap();
        assert!(completed_update.completed);

        let later_update = state
            .challenge_store
            .update_progress(challenge.id, 10.0)
            .unwrap();

        assert!(
            later_update.completed,
            "completion must not reset after further progress"
        );
        let challenges = state.challenge_store.get_by_email("foo@bar.baz").unwrap();
        assert!(challenges[0].completed);
    }

    #[test]
    fn update_progress_fails_on_non_positive_amount() {
        let mut state = get_app_state();
        let challenge = state.challenge_store.create(test_challenge()).unwrap();

        let result = state.challenge_store.update_progress(challenge.id, -5.0);

        assert_eq!(result, Err(Error::InvalidAmount));
    }

    #[test]
    fn update_progress_fails_on_unknown_challenge() {
        let mut state = get_app_state();

        let result = state.challenge_store.update_progress(999, 10.0);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_challenge_fails() {
        let mut state = get_app_state();

        let result = state.challenge_store.delete(999);

        assert_eq!(result, Err(Error::DeleteMissingChallenge));
    }

    #[test]
    fn get_by_email_only_returns_that_users_challenges() {
        let mut state = get_app_state();
        state.challenge_store.create(test_challenge()).unwrap();
        state
            .challenge_store
            .create(NewChallenge {
                user_email: "bar@baz.qux".to_string(),
                ..test_challenge()
            })
            .unwrap();

        let challenges = state.challenge_store.get_by_email("foo@bar.baz").unwrap();

        assert_eq!(challenges.len(), 1, "want 1 challenge, got {challenges:?}");
        assert_eq!(challenges[0].user_email, "foo@bar.baz");
    }
}
