//! Implements the SQLite backed static advice catalog.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    stores::advice::{AdviceStore, AdviceTip},
};

/// The catalog entries seeded when the table is first created.
const SEED_TIPS: [(&str, &str, &str); 8] = [
    (
        "Pay on Time",
        "Always make payments before the due date to build trust with lenders.",
        "Credit Score",
    ),
    (
        "Keep Utilization Low",
        "Use less than 30% of your available credit to maintain a healthy score.",
        "Credit Usage",
    ),
    (
        "Check Your Report Regularly",
        "Monitor your credit report to correct any mistakes early.",
        "Monitoring",
    ),
    (
        "Diversify Credit Types",
        "Having both credit cards and loans shows good credit management.",
        "Credit Mix",
    ),
    (
        "Avoid Frequent Applications",
        "Too many credit applications can lower your score temporarily.",
        "Inquiries",
    ),
    (
        "Build Long-Term Accounts",
        "Older credit accounts improve your score by showing stability.",
        "Account Age",
    ),
    (
        "Don't Close Old Cards",
        "Keeping older accounts open improves your credit history length.",
        "Credit History",
    ),
    (
        "Track Spending",
        "Keeping track of where your money goes helps you avoid overutilization.",
        "Budgeting",
    ),
];

/// Serves general financial advice from a seeded SQLite table.
#[derive(Debug, Clone)]
pub struct SQLiteAdviceStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteAdviceStore {
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

impl AdviceStore for SQLiteAdviceStore {
    /// Draw up to `count` tips at random from the catalog.
    ///
    /// The draw deliberately has no ordering guarantee; callers that need
    /// deterministic advice should use
    /// [advisory_tips](crate::scoring::advisory_tips) instead.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if there is an SQL error.
    fn random_tips(&self, count: u32) -> Result<Vec<AdviceTip>, Error> {
        self.lock()?
            .prepare(
                "SELECT title, content, category FROM financial_tip
                 ORDER BY RANDOM() LIMIT :count",
            )?
            .query_map(&[(":count", &count)], Self::map_row)?
            .map(|maybe_tip| maybe_tip.map_err(Error::from))
            .collect()
    }
}

impl CreateTable for SQLiteAdviceStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS financial_tip (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    content TEXT NOT NULL,
                    category TEXT
                    )",
            (),
        )?;

        let count: i64 =
            connection.query_row("SELECT COUNT(*) FROM financial_tip", [], |row| row.get(0))?;

        if count == 0 {
            let mut statement = connection.prepare(
                "INSERT INTO financial_tip (title, content, category) VALUES (?1, ?2, ?3)",
            )?;

            for (title, content, category) in SEED_TIPS {
                statement.execute((title, content, category))?;
            }
        }

        Ok(())
    }
}

impl MapRow for SQLiteAdviceStore {
    type ReturnType = AdviceTip;

    fn map_row_with_offset(
        row: &rusqlite::Row,
        offset: usize,
    ) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(AdviceTip {
            title: row.get(offset)?,
            content: row.get(offset + 1)?,
            category: row.get(offset + 2)?,
        })
    }
}
