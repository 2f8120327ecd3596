//! Ledgerwise is the ledger-consistency and credit-scoring core of a personal
//! finance application.
//!
//! This library keeps a user's account balances, income/expense aggregates, and
//! derived credit score mutually consistent as transactions are appended, and
//! provides the deterministic scoring and advisory-tip rules that map ledger
//! state to a score in the 300-850 range.
//!
//! The embedding request layer (HTTP routing, authentication, rendering) is out
//! of scope: it constructs an [AppState] backed by the SQLite stores and calls
//! the typed store operations.

#![warn(missing_docs)]

mod app_state;
mod db;
mod models;
mod scoring;
mod stores;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use models::{
    Account, AccountId, Category, CategoryName, CreditScoreRecord, DEFAULT_ACCOUNT_NAME,
    DEFAULT_ACCOUNT_TYPE, DEFAULT_CREDIT_LIMIT, DatabaseID, NewChallenge, NewTransaction, NewUser,
    SavingsChallenge, Transaction, TransactionKind, User, UserID,
};
pub use scoring::{
    Aggregates, BASE_SCORE, MAX_SCORE, MIN_SCORE, Tip, advisory_tips, compute_score,
};
pub use stores::{
    AdviceStore, AdviceTip, AppendOutcome, ChallengeStore, LedgerStore, ProgressUpdate, Snapshot,
    UserStore, sqlite,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Callers should check that the referenced user, account, or challenge
    /// exists and that the IDs are correct.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A non-positive amount was given where a positive amount is required,
    /// for example a challenge goal or a progress increment.
    #[error("the amount must be greater than zero")]
    InvalidAmount,

    /// The declared transaction kind was neither "income" nor "expense".
    #[error("\"{0}\" is not a valid transaction kind")]
    InvalidKind(String),

    /// An empty string was used as a savings challenge title.
    #[error("challenge title cannot be empty")]
    EmptyChallengeTitle,

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The email used to create a user is already in use.
    #[error("the email is already in use")]
    DuplicateEmail,

    /// The display name used to create a user is already in use.
    #[error("the display name is already in use")]
    DuplicateUsername,

    /// Tried to delete a savings challenge that does not exist.
    #[error("tried to delete a challenge that is not in the database")]
    DeleteMissingChallenge,

    /// The cached account balances diverged from the sum of the recorded
    /// transactions.
    ///
    /// This should never occur as long as every write goes through the atomic
    /// append path. Snapshot reads recover by preferring the true sum; this
    /// error is only surfaced by the explicit consistency audit.
    #[error("cached balance {cached} does not equal the transaction sum {actual}")]
    BalanceMismatch {
        /// The balance total summed from the account rows.
        cached: f64,
        /// The balance total summed from the recorded transactions.
        actual: f64,
    },

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.display_name") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
