//! This module defines the domain data types.

mod account;
mod category;
mod challenge;
mod credit_score;
mod transaction;
mod user;

pub use account::{Account, AccountId, DEFAULT_ACCOUNT_NAME, DEFAULT_ACCOUNT_TYPE,
    DEFAULT_CREDIT_LIMIT};
pub use category::{
    Category, CategoryName, DEFAULT_EXPENSE_CATEGORY, DEFAULT_INCOME_CATEGORY,
};
pub use challenge::{NewChallenge, SavingsChallenge};
pub use credit_score::CreditScoreRecord;
pub use transaction::{NewTransaction, Transaction, TransactionKind};
pub use user::{NewUser, User, UserID};

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
