//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewUser, User, UserID},
    scoring::BASE_SCORE,
    stores::{sqlite::ledger, user::UserStore},
};

/// The provider attributed to the initial credit score record.
const INITIAL_SCORE_PROVIDER: &str = "Experian";

/// Stores users in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
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

impl UserStore for SQLiteUserStore {
    /// Create a new user along with their default account and an initial
    /// credit score record, so the user's ledger is consistent before the
    /// first transaction arrives.
    ///
    /// The three inserts run inside one SQLite transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateEmail] if the email is already taken,
    /// - [Error::DuplicateUsername] if the display name is already taken,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error> {
        let connection = self.lock()?;
        let sql_transaction = connection.unchecked_transaction()?;

        sql_transaction.execute(
            "INSERT INTO user (email, display_name, password_hash) VALUES (?1, ?2, ?3)",
            (
                &new_user.email,
                &new_user.display_name,
                &new_user.password_hash,
            ),
        )?;
        let user_id = UserID::new(sql_transaction.last_insert_rowid());

        ledger::create_default_account(&sql_transaction, user_id)?;

        let today = time::OffsetDateTime::now_utc().date();
        sql_transaction.execute(
            "INSERT INTO credit_score (user_id, score, report_date, provider)
             VALUES (?1, ?2, ?3, ?4)",
            (
                user_id.as_i64(),
                BASE_SCORE as i64,
                &today,
                INITIAL_SCORE_PROVIDER,
            ),
        )?;

        sql_transaction.commit()?;

        Ok(User::new(
            user_id,
            new_user.email,
            new_user.display_name,
            new_user.password_hash,
        ))
    }

    /// Get the user with the specified `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has the given ID.
    fn get(&self, user_id: UserID) -> Result<User, Error> {
        let user = self
            .lock()?
            .prepare(
                "SELECT id, email, display_name, password_hash FROM user WHERE id = :id",
            )?
            .query_row(&[(":id", &user_id.as_i64())], Self::map_row)?;

        Ok(user)
    }

    /// Get the user with the specified `email` address.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has the given email.
    fn get_by_email(&self, email: &str) -> Result<User, Error> {
        let user = self
            .lock()?
            .prepare(
                "SELECT id, email, display_name, password_hash FROM user WHERE email = :email",
            )?
            .query_row(&[(":email", &email)], Self::map_row)?;

        Ok(user)
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    email TEXT NOT NULL UNIQUE,
                    display_name TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(
        row: &rusqlite::Row,
        offset: usize,
    ) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(User::new(
            UserID::new(row.get(offset)?),
            row.get(offset + 1)?,
            row.get(offset + 2)?,
            row.get(offset + 3)?,
        ))
    }
}
