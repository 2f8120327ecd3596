//! Contains convenience type alias and function for [AppState] that uses
//! the SQLite backend.

mod advice;
mod challenge;
mod ledger;
mod user;

pub use advice::SQLiteAdviceStore;
pub use challenge::SQLiteChallengeStore;
pub use ledger::SQLiteLedgerStore;
pub use user::SQLiteUserStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState =
    AppState<SQLiteLedgerStore, SQLiteUserStore, SQLiteChallengeStore, SQLiteAdviceStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
pub fn create_app_state(db_connection: Connection) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));
    let ledger_store = SQLiteLedgerStore::new(connection.clone());
    let user_store = SQLiteUserStore::new(connection.clone());
    let challenge_store = SQLiteChallengeStore::new(connection.clone());
    let advice_store = SQLiteAdviceStore::new(connection.clone());

    Ok(AppState::new(
        connection,
        ledger_store,
        user_store,
        challenge_store,
        advice_store,
    ))
}
