//! Defines the ledger store trait: the single invariant-preserving write path
//! for transactions and the read-only aggregate views derived from them.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    models::{Account, Category, CreditScoreRecord, NewTransaction, Transaction, UserID},
    scoring::Aggregates,
};

/// A read-only aggregate view of one user's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The income, expense, balance, and credit-limit totals the scoring
    /// engine consumes.
    pub aggregates: Aggregates,
    /// The user's current credit score, if one has been computed.
    pub latest_score: Option<i64>,
    /// When the current score was computed, if one exists.
    pub score_date: Option<Date>,
}

/// The result of appending a transaction to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppendOutcome {
    /// The transaction as stored, with its sign reconciled against the
    /// declared kind.
    pub transaction: Transaction,
    /// The posted account's balance after the append.
    pub new_balance: f64,
    /// The user's credit score recomputed from the refreshed aggregates.
    pub new_score: i64,
}

/// Handles the durable, consistent storage of accounts, transactions, and the
/// derived credit score.
pub trait LedgerStore {
    /// Aggregate all transactions and accounts for `user_id` into a
    /// [Snapshot].
    ///
    /// Reading the same snapshot twice with no intervening append returns
    /// identical aggregates. Implementers must compare the cached account
    /// balances against the true transaction sum and prefer the latter if the
    /// two have diverged, logging the divergence.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `user_id` does not refer to a valid user.
    fn snapshot(&self, user_id: UserID) -> Result<Snapshot, Error>;

    /// Append a transaction to the ledger for `user_id` and bring the owning
    /// account's balance, the user's aggregates, and the derived credit score
    /// up to date in one atomic unit.
    ///
    /// If any step fails, no partial state (an inserted transaction without
    /// the balance update, or vice versa) is observable by subsequent reads.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `user_id` does not refer to a valid user,
    /// or if the request names an account that does not belong to the user.
    fn append_transaction(
        &mut self,
        user_id: UserID,
        request: NewTransaction,
    ) -> Result<AppendOutcome, Error>;

    /// Retrieve all transactions for `user_id`, most recent first.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `user_id` does not refer to a valid user.
    fn transactions(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// Retrieve all accounts belonging to `user_id`, in ID order.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `user_id` does not refer to a valid user.
    fn accounts(&self, user_id: UserID) -> Result<Vec<Account>, Error>;

    /// Retrieve all categories, in ID order.
    ///
    /// Categories are shared across users.
    fn categories(&self) -> Result<Vec<Category>, Error>;

    /// Retrieve the current credit score record for `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `user_id` does not refer to a valid user
    /// or the user has never been scored.
    fn credit_score(&self, user_id: UserID) -> Result<CreditScoreRecord, Error>;

    /// Audit the balance cache for `user_id` against the recorded
    /// transactions.
    ///
    /// # Errors
    /// Returns [Error::BalanceMismatch] if the cached account balances do not
    /// sum to the true transaction sum, and [Error::NotFound] if `user_id`
    /// does not refer to a valid user.
    fn check_consistency(&self, user_id: UserID) -> Result<(), Error>;
}
