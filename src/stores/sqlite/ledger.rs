//! Implements a SQLite backed ledger store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{
        Account, AccountId, Category, CategoryName, CreditScoreRecord, DEFAULT_ACCOUNT_NAME,
        DEFAULT_ACCOUNT_TYPE, DEFAULT_CREDIT_LIMIT, DatabaseID, NewTransaction, Transaction,
        TransactionKind, UserID,
    },
    scoring::{Aggregates, compute_score},
    stores::ledger::{AppendOutcome, LedgerStore, Snapshot},
};

/// The largest cache drift tolerated before a balance is considered diverged.
///
/// Balances are `f64`, so repeated increments can pick up float noise well
/// below any monetary unit.
const BALANCE_EPSILON: f64 = 1e-6;

/// Stores accounts, transactions, categories, and the derived credit score in
/// a SQLite database, and owns the single invariant-preserving write path that
/// keeps them consistent.
///
/// Note that because transactions reference the [User](crate::models::User)
/// model, the user table must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteLedgerStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteLedgerStore {
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

impl LedgerStore for SQLiteLedgerStore {
    fn snapshot(&self, user_id: UserID) -> Result<Snapshot, Error> {
        let connection = self.lock()?;

        ensure_user_exists(&connection, user_id)?;
        let aggregates = aggregate_user(&connection, user_id)?;
        let (latest_score, score_date) = current_score(&connection, user_id)?;

        Ok(Snapshot {
            aggregates,
            latest_score,
            score_date,
        })
    }

    /// Append a transaction and bring the balance cache, aggregates, and
    /// credit score up to date.
    ///
    /// The whole sequence runs inside one SQLite transaction, so concurrent
    /// appends for the same user serialize on the database and a failure at
    /// any step leaves no partial state behind.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `user_id` does not refer to a valid user or the
    ///   request names an account the user does not own,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn append_transaction(
        &mut self,
        user_id: UserID,
        request: NewTransaction,
    ) -> Result<AppendOutcome, Error> {
        let connection = self.lock()?;
        let sql_transaction = connection.unchecked_transaction()?;

        ensure_user_exists(&sql_transaction, user_id)?;

        let account_id = resolve_account(&sql_transaction, user_id, request.account_id)?;
        let (kind, amount) = request.resolve_amount();
        let category_id = resolve_category(&sql_transaction, request.category_id, kind)?;

        let transaction = sql_transaction
            .prepare(
                "INSERT INTO \"transaction\" (user_id, account_id, category_id, amount, description, date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, user_id, account_id, category_id, amount, description, date",
            )?
            .query_row(
                (
                    user_id.as_i64(),
                    account_id,
                    category_id,
                    amount,
                    &request.description,
                    &request.date,
                ),
                Self::map_row,
            )?;

        sql_transaction.execute(
            "UPDATE account SET balance = balance + ?1 WHERE id = ?2",
            (amount, account_id),
        )?;

        let new_balance: f64 = sql_transaction.query_row(
            "SELECT balance FROM account WHERE id = ?1",
            [account_id],
            |row| row.get(0),
        )?;

        let aggregates = aggregate_user(&sql_transaction, user_id)?;
        let new_score = compute_score(&aggregates);
        upsert_score(&sql_transaction, user_id, new_score)?;

        sql_transaction.commit()?;

        tracing::debug!(
            "appended {kind} of {amount} for user {user_id}: balance {new_balance}, score {new_score}"
        );

        Ok(AppendOutcome {
            transaction,
            new_balance,
            new_score,
        })
    }

    fn transactions(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        ensure_user_exists(&connection, user_id)?;

        connection
            .prepare(
                "SELECT id, user_id, account_id, category_id, amount, description, date
                 FROM \"transaction\"
                 WHERE user_id = :user_id
                 ORDER BY date DESC, id DESC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    fn accounts(&self, user_id: UserID) -> Result<Vec<Account>, Error> {
        let connection = self.lock()?;

        ensure_user_exists(&connection, user_id)?;

        connection
            .prepare(
                "SELECT id, user_id, name, account_type, balance, credit_limit
                 FROM account
                 WHERE user_id = :user_id
                 ORDER BY id",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], map_row_to_account)?
            .map(|maybe_account| maybe_account.map_err(Error::from))
            .collect()
    }

    fn categories(&self) -> Result<Vec<Category>, Error> {
        self.lock()?
            .prepare("SELECT id, name FROM category ORDER BY id")?
            .query_map([], map_row_to_category)?
            .map(|maybe_category| maybe_category.map_err(Error::from))
            .collect()
    }

    fn credit_score(&self, user_id: UserID) -> Result<CreditScoreRecord, Error> {
        let connection = self.lock()?;

        ensure_user_exists(&connection, user_id)?;

        connection
            .query_row(
                "SELECT id, user_id, score, report_date, provider
                 FROM credit_score WHERE user_id = ?1",
                [user_id.as_i64()],
                |row| {
                    Ok(CreditScoreRecord {
                        id: row.get(0)?,
                        user_id: UserID::new(row.get(1)?),
                        score: row.get(2)?,
                        report_date: row.get(3)?,
                        provider: row.get(4)?,
                    })
                },
            )
            .map_err(Error::from)
    }

    fn check_consistency(&self, user_id: UserID) -> Result<(), Error> {
        let connection = self.lock()?;

        ensure_user_exists(&connection, user_id)?;

        let cached = cached_balance_total(&connection, user_id)?;
        let actual = transaction_sum(&connection, user_id)?;

        if (cached - actual).abs() > BALANCE_EPSILON {
            Err(Error::BalanceMismatch { cached, actual })
        } else {
            Ok(())
        }
    }
}

impl CreateTable for SQLiteLedgerStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS account (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    account_type TEXT NOT NULL,
                    balance REAL NOT NULL,
                    credit_limit REAL NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL
                    )",
            (),
        )?;

        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    account_id INTEGER NOT NULL,
                    category_id INTEGER NOT NULL,
                    amount REAL NOT NULL,
                    description TEXT NOT NULL,
                    date TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                    FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE,
                    FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        connection.execute(
            "CREATE TABLE IF NOT EXISTS credit_score (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL UNIQUE,
                    score INTEGER NOT NULL,
                    report_date TEXT NOT NULL,
                    provider TEXT,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteLedgerStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &rusqlite::Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transaction::new(
            row.get(offset)?,
            UserID::new(row.get(offset + 1)?),
            row.get(offset + 2)?,
            row.get(offset + 3)?,
            row.get(offset + 4)?,
            row.get(offset + 5)?,
            row.get(offset + 6)?,
        ))
    }
}

fn map_row_to_account(row: &rusqlite::Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        account_type: row.get(3)?,
        balance: row.get(4)?,
        credit_limit: row.get(5)?,
    })
}

fn map_row_to_category(row: &rusqlite::Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&row.get::<_, String>(1)?),
    })
}

fn ensure_user_exists(connection: &Connection, user_id: UserID) -> Result<(), Error> {
    connection
        .query_row(
            "SELECT id FROM user WHERE id = ?1",
            [user_id.as_i64()],
            |row| row.get::<_, i64>(0),
        )
        .map(|_| ())
        .map_err(Error::from)
}

/// Resolve the account to post against: a supplied ID must belong to the user,
/// otherwise the user's first account by ID order is used, provisioning the
/// default account when the user has none.
fn resolve_account(
    connection: &Connection,
    user_id: UserID,
    account_id: Option<AccountId>,
) -> Result<AccountId, Error> {
    if let Some(id) = account_id {
        return connection
            .query_row(
                "SELECT id FROM account WHERE id = ?1 AND user_id = ?2",
                (id, user_id.as_i64()),
                |row| row.get(0),
            )
            .map_err(Error::from);
    }

    let first_account = connection.query_row(
        "SELECT id FROM account WHERE user_id = ?1 ORDER BY id LIMIT 1",
        [user_id.as_i64()],
        |row| row.get::<_, AccountId>(0),
    );

    match first_account {
        Ok(id) => Ok(id),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            create_default_account(connection, user_id)
        }
        Err(error) => Err(error.into()),
    }
}

/// Provision the default account a user's first transaction posts against.
pub(super) fn create_default_account(
    connection: &Connection,
    user_id: UserID,
) -> Result<AccountId, Error> {
    connection.execute(
        "INSERT INTO account (user_id, name, account_type, balance, credit_limit)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            user_id.as_i64(),
            DEFAULT_ACCOUNT_NAME,
            DEFAULT_ACCOUNT_TYPE,
            0.0,
            DEFAULT_CREDIT_LIMIT,
        ),
    )?;

    Ok(connection.last_insert_rowid())
}

/// Resolve the category to record against, creating the row if the referenced
/// or defaulted category does not exist yet.
///
/// An explicitly supplied but unknown ID is created under that ID with the
/// kind's default name, so the transaction's reference stays valid.
fn resolve_category(
    connection: &Connection,
    category_id: Option<DatabaseID>,
    kind: TransactionKind,
) -> Result<DatabaseID, Error> {
    let (default_id, default_name) = kind.default_category();
    let category_id = category_id.unwrap_or(default_id);

    let exists = connection.query_row(
        "SELECT id FROM category WHERE id = ?1",
        [category_id],
        |row| row.get::<_, DatabaseID>(0),
    );

    match exists {
        Ok(id) => Ok(id),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            let name = CategoryName::new_unchecked(default_name);
            connection.execute(
                "INSERT INTO category (id, name) VALUES (?1, ?2)",
                (category_id, name.as_ref()),
            )?;

            Ok(category_id)
        }
        Err(error) => Err(error.into()),
    }
}

/// Aggregate the user's ledger into the totals the scoring engine consumes.
///
/// The cached balance total is cross-checked against the true transaction sum;
/// if the two have diverged the true sum wins and the divergence is logged.
fn aggregate_user(connection: &Connection, user_id: UserID) -> Result<Aggregates, Error> {
    let (income_total, expense_total) = connection.query_row(
        "SELECT
            COALESCE(SUM(CASE WHEN amount > 0 THEN amount ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN amount < 0 THEN -amount ELSE 0 END), 0)
         FROM \"transaction\" WHERE user_id = ?1",
        [user_id.as_i64()],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let credit_limit_total: f64 = connection.query_row(
        "SELECT COALESCE(SUM(credit_limit), 0) FROM account WHERE user_id = ?1",
        [user_id.as_i64()],
        |row| row.get(0),
    )?;

    let cached = cached_balance_total(connection, user_id)?;
    let actual = transaction_sum(connection, user_id)?;

    let balance_total = if (cached - actual).abs() > BALANCE_EPSILON {
        tracing::error!(
            "balance cache diverged for user {user_id}: cached {cached}, transaction sum {actual}"
        );
        actual
    } else {
        cached
    };

    Ok(Aggregates {
        income_total,
        expense_total,
        balance_total,
        credit_limit_total,
    })
}

fn cached_balance_total(connection: &Connection, user_id: UserID) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(balance), 0) FROM account WHERE user_id = ?1",
            [user_id.as_i64()],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

fn transaction_sum(connection: &Connection, user_id: UserID) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM \"transaction\" WHERE user_id = ?1",
            [user_id.as_i64()],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

fn current_score(
    connection: &Connection,
    user_id: UserID,
) -> Result<(Option<i64>, Option<time::Date>), Error> {
    let result = connection.query_row(
        "SELECT score, report_date FROM credit_score WHERE user_id = ?1",
        [user_id.as_i64()],
        |row| Ok((row.get(0)?, row.get(1)?)),
    );

    match result {
        Ok((score, report_date)) => Ok((Some(score), Some(report_date))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok((None, None)),
        Err(error) => Err(error.into()),
    }
}

/// Overwrite the user's current score in place, inserting the record if the
/// user has never been scored. Scores are never historized.
fn upsert_score(
    connection: &Connection,
    user_id: UserID,
    score: i64,
) -> Result<(), Error> {
    let today = time::OffsetDateTime::now_utc().date();

    let updated = connection.execute(
        "UPDATE credit_score SET score = ?1, report_date = ?2 WHERE user_id = ?3",
        (score, &today, user_id.as_i64()),
    )?;

    if updated == 0 {
        connection.execute(
            "INSERT INTO credit_score (user_id, score, report_date) VALUES (?1, ?2, ?3)",
            (user_id.as_i64(), score, &today),
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod sqlite_ledger_store_tests {
    use time::macros::date;

    use crate::{
        Error,
        models::{NewTransaction, NewUser, TransactionKind, UserID},
        stores::{
            LedgerStore, UserStore,
            sqlite::{SQLAppState, create_app_state},
        },
    };

    fn get_app_state() -> (SQLAppState, UserID) {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let mut state = create_app_state(conn).unwrap();

        let user = state
            .user_store
            .create(NewUser {
                email: "foo@bar.baz".to_string(),
                display_name: "foo".to_string(),
                password_hash: "hunter2".to_string(),
            })
            .unwrap();

        (state, user.id())
    }

    #[test]
    fn append_updates_balance_by_signed_amount() {
        let (mut state, user_id) = get_app_state();

        let outcome = state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(-150.0, "Groceries", date!(2024 - 08 - 07)),
            )
            .unwrap();

        assert_eq!(outcome.transaction.amount(), -150.0);
        assert_eq!(outcome.transaction.kind(), TransactionKind::Expense);
        assert_eq!(outcome.new_balance, -150.0);
    }

    #[test]
    fn append_coerces_amount_to_declared_kind() {
        let (mut state, user_id) = get_app_state();

        let outcome = state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(-50.0, "Refund", date!(2024 - 08 - 07))
                    .kind(TransactionKind::Income),
            )
            .unwrap();

        assert_eq!(outcome.transaction.amount(), 50.0);
        assert_eq!(outcome.new_balance, 50.0);
    }

    #[test]
    fn append_fails_for_unknown_user() {
        let (mut state, user_id) = get_app_state();

        let result = state.ledger_store.append_transaction(
            UserID::new(user_id.as_i64() + 42),
            NewTransaction::new(10.0, "Pocket money", date!(2024 - 08 - 07)),
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn append_fails_for_account_owned_by_someone_else() {
        let (mut state, user_id) = get_app_state();
        let other_user = state
            .user_store
            .create(NewUser {
                email: "bar@baz.qux".to_string(),
                display_name: "bar".to_string(),
                password_hash: "hunter3".to_string(),
            })
            .unwrap();
        let other_account = state
            .ledger_store
            .append_transaction(
                other_user.id(),
                NewTransaction::new(10.0, "Seed", date!(2024 - 08 - 07)),
            )
            .unwrap()
            .transaction
            .account_id();

        let result = state.ledger_store.append_transaction(
            user_id,
            NewTransaction::new(10.0, "Sneaky", date!(2024 - 08 - 07)).account(other_account),
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn append_failure_leaves_no_partial_state() {
        let (mut state, user_id) = get_app_state();
        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(100.0, "Salary", date!(2024 - 08 - 07)),
            )
            .unwrap();

        let result = state.ledger_store.append_transaction(
            user_id,
            NewTransaction::new(10.0, "Bad account", date!(2024 - 08 - 08)).account(9999),
        );
        assert_eq!(result, Err(Error::NotFound));

        let snapshot = state.ledger_store.snapshot(user_id).unwrap();
        assert_eq!(snapshot.aggregates.income_total, 100.0);
        assert_eq!(snapshot.aggregates.balance_total, 100.0);
        let transactions = state.ledger_store.transactions(user_id).unwrap();
        assert_eq!(
            transactions.len(),
            1,
            "want 1 transaction after failed append, got {}",
            transactions.len()
        );
    }

    #[test]
    fn balance_equals_transaction_sum_after_many_appends() {
        let (mut state, user_id) = get_app_state();
        let amounts = [1200.0, -450.5, -19.99, 300.0, -75.25, -0.01];

        for (i, amount) in amounts.iter().enumerate() {
            state
                .ledger_store
                .append_transaction(
                    user_id,
                    NewTransaction::new(*amount, &format!("transaction #{i}"), date!(2024 - 08 - 07)),
                )
                .unwrap();
        }

        let want: f64 = amounts.iter().sum();
        let snapshot = state.ledger_store.snapshot(user_id).unwrap();

        assert!(
            (snapshot.aggregates.balance_total - want).abs() < 1e-9,
            "want balance {want}, got {}",
            snapshot.aggregates.balance_total
        );
        assert_eq!(state.ledger_store.check_consistency(user_id), Ok(()));
    }

    #[test]
    fn snapshot_is_idempotent() {
        let (mut state, user_id) = get_app_state();
        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(1000.0, "Salary", date!(2024 - 08 - 07)),
            )
            .unwrap();
        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(-200.0, "Rent", date!(2024 - 08 - 08)),
            )
            .unwrap();

        let first = state.ledger_store.snapshot(user_id).unwrap();
        let second = state.ledger_store.snapshot(user_id).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn snapshot_fails_for_unknown_user() {
        let (state, user_id) = get_app_state();

        let result = state.ledger_store.snapshot(UserID::new(user_id.as_i64() + 1));

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn snapshot_splits_income_and_expense_totals() {
        let (mut state, user_id) = get_app_state();
        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(1000.0, "Salary", date!(2024 - 08 - 07)),
            )
            .unwrap();
        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(-200.0, "Rent", date!(2024 - 08 - 08)),
            )
            .unwrap();

        let snapshot = state.ledger_store.snapshot(user_id).unwrap();

        assert_eq!(snapshot.aggregates.income_total, 1000.0);
        assert_eq!(snapshot.aggregates.expense_total, 200.0);
        assert_eq!(snapshot.aggregates.balance_total, 800.0);
    }

    #[test]
    fn append_recomputes_and_stores_score() {
        let (mut state, user_id) = get_app_state();

        // Default account limit is 1000: utilization 200/1000 = 20% (+10),
        // expenses under half of income (+10), positive balance (+5).
        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(1000.0, "Salary", date!(2024 - 08 - 07)),
            )
            .unwrap();
        let outcome = state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(-200.0, "Rent", date!(2024 - 08 - 08)),
            )
            .unwrap();

        assert_eq!(outcome.new_score, 725);

        let snapshot = state.ledger_store.snapshot(user_id).unwrap();
        assert_eq!(snapshot.latest_score, Some(725));
        assert!(snapshot.score_date.is_some());
    }

    #[test]
    fn score_is_overwritten_not_historized() {
        let (mut state, user_id) = get_app_state();

        for amount in [1000.0, -100.0, -900.0] {
            state
                .ledger_store
                .append_transaction(
                    user_id,
                    NewTransaction::new(amount, "movement", date!(2024 - 08 - 07)),
                )
                .unwrap();
        }

        let connection = state.db_connection.lock().unwrap();
        let count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM credit_score WHERE user_id = ?1",
                [user_id.as_i64()],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(count, 1, "want a single credit score row, got {count}");
    }

    #[test]
    fn transactions_are_listed_most_recent_first() {
        let (mut state, user_id) = get_app_state();
        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(10.0, "older", date!(2024 - 08 - 01)),
            )
            .unwrap();
        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(20.0, "newer", date!(2024 - 08 - 15)),
            )
            .unwrap();

        let transactions = state.ledger_store.transactions(user_id).unwrap();

        let descriptions: Vec<_> = transactions
            .iter()
            .map(|transaction| transaction.description())
            .collect();
        assert_eq!(descriptions, ["newer", "older"]);
    }

    #[test]
    fn credit_score_reflects_the_latest_append() {
        let (mut state, user_id) = get_app_state();
        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(1000.0, "Salary", date!(2024 - 08 - 07)),
            )
            .unwrap();
        let outcome = state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(-200.0, "Rent", date!(2024 - 08 - 08)),
            )
            .unwrap();

        let record = state.ledger_store.credit_score(user_id).unwrap();

        assert_eq!(record.score, outcome.new_score);
        assert_eq!(record.user_id, user_id);
    }

    #[test]
    fn accounts_lists_the_provisioned_default_account() {
        let (mut state, user_id) = get_app_state();
        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(250.0, "Salary", date!(2024 - 08 - 07)),
            )
            .unwrap();

        let accounts = state.ledger_store.accounts(user_id).unwrap();

        assert_eq!(accounts.len(), 1, "want 1 account, got {accounts:?}");
        assert_eq!(accounts[0].name, "Main Account");
        assert_eq!(accounts[0].balance, 250.0);
        assert_eq!(accounts[0].credit_limit, 1000.0);
    }

    #[test]
    fn categories_lists_rows_created_by_appends() {
        let (mut state, user_id) = get_app_state();
        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(1000.0, "Salary", date!(2024 - 08 - 07)),
            )
            .unwrap();
        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(-200.0, "Rent", date!(2024 - 08 - 08)),
            )
            .unwrap();

        let categories = state.ledger_store.categories().unwrap();

        let names: Vec<_> = categories
            .iter()
            .map(|category| category.name.as_ref())
            .collect();
        assert_eq!(names, ["Salary", "Other Expense"]);
    }

    #[test]
    fn snapshot_prefers_transaction_sum_over_corrupted_cache() {
        let (mut state, user_id) = get_app_state();
        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(500.0, "Salary", date!(2024 - 08 - 07)),
            )
            .unwrap();

        // Corrupt the cache behind the store's back.
        state
            .db_connection
            .lock()
            .unwrap()
            .execute(
                "UPDATE account SET balance = balance + 123.0 WHERE user_id = ?1",
                [user_id.as_i64()],
            )
            .unwrap();

        let snapshot = state.ledger_store.snapshot(user_id).unwrap();

        assert_eq!(snapshot.aggregates.balance_total, 500.0);
        assert_eq!(
            state.ledger_store.check_consistency(user_id),
            Err(Error::BalanceMismatch {
                cached: 623.0,
                actual: 500.0
            })
        );
    }

    #[test]
    fn appends_for_different_users_are_independent() {
        let (mut state, user_id) = get_app_state();
        let other_user = state
            .user_store
            .create(NewUser {
                email: "bar@baz.qux".to_string(),
                display_name: "bar".to_string(),
                password_hash: "hunter3".to_string(),
            })
            .unwrap();

        state
            .ledger_store
            .append_transaction(
                user_id,
                NewTransaction::new(100.0, "Salary", date!(2024 - 08 - 07)),
            )
            .unwrap();
        state
            .ledger_store
            .append_transaction(
                other_user.id(),
                NewTransaction::new(-40.0, "Snacks", date!(2024 - 08 - 07)),
            )
            .unwrap();

        let snapshot = state.ledger_store.snapshot(user_id).unwrap();
        let other_snapshot = state.ledger_store.snapshot(other_user.id()).unwrap();

        assert_eq!(snapshot.aggregates.balance_total, 100.0);
        assert_eq!(other_snapshot.aggregates.balance_total, -40.0);
    }
}
