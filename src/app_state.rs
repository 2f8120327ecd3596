//! Implements a struct that holds the state shared with the request layer.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::stores::{AdviceStore, ChallengeStore, LedgerStore, UserStore};

/// The state of the application core handed to the embedding request layer.
///
/// Generic over the store traits so request handlers can be tested against
/// lightweight fakes; production code uses the SQLite-backed
/// [SQLAppState](crate::sqlite::SQLAppState).
#[derive(Debug, Clone)]
pub struct AppState<L, U, C, A>
where
    L: LedgerStore,
    U: UserStore,
    C: ChallengeStore,
    A: AdviceStore,
{
    /// The database connection, shared with the stores.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The ledger of accounts, transactions, and the derived credit score.
    pub ledger_store: L,

    /// The store for users.
    pub user_store: U,

    /// The store for savings challenges.
    pub challenge_store: C,

    /// The static advice catalog.
    pub advice_store: A,
}

impl<L, U, C, A> AppState<L, U, C, A>
where
    L: LedgerStore,
    U: UserStore,
    C: ChallengeStore,
    A: AdviceStore,
{
    /// Create a new [AppState] from its stores.
    pub fn new(
        db_connection: Arc<Mutex<Connection>>,
        ledger_store: L,
        user_store: U,
        challenge_store: C,
        advice_store: A,
    ) -> Self {
        Self {
            db_connection,
            ledger_store,
            user_store,
            challenge_store,
            advice_store,
        }
    }
}
