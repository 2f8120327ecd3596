//! Defines the traits for setting up the application's database and mapping
//! query rows to domain types.

use rusqlite::{Connection, Row, Transaction as SqlTransaction};

use crate::{
    Error,
    stores::sqlite::{
        SQLiteAdviceStore, SQLiteChallengeStore, SQLiteLedgerStore, SQLiteUserStore,
    },
};

/// A trait for adding an object schema to the database.
pub trait CreateTable {
    /// Create the tables the implementer reads and writes.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for mapping a `rusqlite::Row` from the database to a concrete rust
/// type.
pub trait MapRow {
    /// The type each row is mapped to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the
    /// table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type, reading from the column at `offset`.
    ///
    /// This is useful when tables have been joined and two different types are
    /// constructed from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// Create the tables for all domain models.
///
/// Table creation runs in a single exclusive transaction so that concurrent
/// initialization attempts cannot observe a half-created schema.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    SQLiteUserStore::create_table(&transaction)?;
    SQLiteLedgerStore::create_table(&transaction)?;
    SQLiteChallengeStore::create_table(&transaction)?;
    SQLiteAdviceStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
