//! This file defines the type `Transaction`, the core type of the ledger, and
//! the `TransactionKind` decision type that reconciles a declared kind with the
//! sign of an amount.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    models::{
        AccountId, DEFAULT_EXPENSE_CATEGORY, DEFAULT_INCOME_CATEGORY, DatabaseID, UserID,
    },
};

/// Whether a transaction brings money in or takes money out.
///
/// The sign of a transaction amount alone determines its classification, but a
/// caller may also declare the kind explicitly. The two are reconciled by
/// [TransactionKind::signed_amount]: a declared kind always wins and the amount
/// is coerced to match it, never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in; stored with a positive amount.
    Income,
    /// Money going out; stored with a negative amount.
    Expense,
}

impl TransactionKind {
    /// Infer the kind from the sign of `amount`.
    ///
    /// Zero counts as income so that the inferred kind never flips the sign of
    /// the amount it was inferred from.
    pub fn from_amount(amount: f64) -> Self {
        if amount >= 0.0 {
            Self::Income
        } else {
            Self::Expense
        }
    }

    /// Coerce `amount` to the sign this kind dictates.
    pub fn signed_amount(&self, amount: f64) -> f64 {
        match self {
            Self::Income => amount.abs(),
            Self::Expense => -amount.abs(),
        }
    }

    /// The fixed ID and name of the category this kind falls back to when no
    /// valid category is supplied.
    pub fn default_category(&self) -> (DatabaseID, &'static str) {
        match self {
            Self::Income => DEFAULT_INCOME_CATEGORY,
            Self::Expense => DEFAULT_EXPENSE_CATEGORY,
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(Error::InvalidKind(s.to_string())),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are immutable once created: there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: DatabaseID,
    user_id: UserID,
    account_id: AccountId,
    category_id: DatabaseID,
    amount: f64,
    description: String,
    date: Date,
}

impl Transaction {
    /// Construct a transaction from its parts.
    ///
    /// This does not insert the transaction into the database, see
    /// [LedgerStore::append_transaction](crate::LedgerStore::append_transaction).
    pub fn new(
        id: DatabaseID,
        user_id: UserID,
        account_id: AccountId,
        category_id: DatabaseID,
        amount: f64,
        description: String,
        date: Date,
    ) -> Self {
        Self {
            id,
            user_id,
            account_id,
            category_id,
            amount,
            description,
            date,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The ID of the user that recorded this transaction.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The ID of the account the transaction was posted against.
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// The category that describes the type of the transaction.
    pub fn category_id(&self) -> DatabaseID {
        self.category_id
    }

    /// The amount of money spent or earned, signed.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// A text description of what the transaction was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// When the transaction happened.
    pub fn date(&self) -> &Date {
        &self.date
    }

    /// The classification the stored amount's sign implies.
    pub fn kind(&self) -> TransactionKind {
        TransactionKind::from_amount(self.amount)
    }
}

/// The data required to append a new transaction to the ledger.
///
/// `kind`, `account_id`, and `category_id` are optional: the ledger store
/// infers the kind from the amount's sign, falls back to the user's first
/// account (provisioning one if need be), and resolves or creates the category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The amount of money spent or earned.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// The declared classification, which takes precedence over the amount's
    /// sign when present.
    pub kind: Option<TransactionKind>,
    /// The account to post against, defaulting to the user's first account.
    pub account_id: Option<AccountId>,
    /// The category to record against, defaulting by kind.
    pub category_id: Option<DatabaseID>,
}

impl NewTransaction {
    /// Create a new transaction request with only the required fields set.
    pub fn new(amount: f64, description: &str, date: Date) -> Self {
        Self {
            amount,
            description: description.to_string(),
            date,
            kind: None,
            account_id: None,
            category_id: None,
        }
    }

    /// Declare the transaction kind, overriding the amount's sign.
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Post against a specific account instead of the user's first account.
    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Record against a specific category.
    pub fn category(mut self, category_id: DatabaseID) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Resolve the kind and the signed amount this request should be stored
    /// with.
    ///
    /// A declared kind wins over the amount's sign and the amount is coerced to
    /// match. When no kind is declared it is inferred from the sign, which
    /// leaves the amount unchanged.
    pub fn resolve_amount(&self) -> (TransactionKind, f64) {
        let kind = self
            .kind
            .unwrap_or_else(|| TransactionKind::from_amount(self.amount));

        (kind, kind.signed_amount(self.amount))
    }
}
