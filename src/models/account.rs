//! This file defines the `Account` type, a bank account or credit card owned by
//! a single user.

use serde::{Deserialize, Serialize};

use crate::models::{DatabaseID, UserID};

/// Alias for the integer type used for account IDs.
pub type AccountId = DatabaseID;

/// The name given to an account that is provisioned automatically.
pub const DEFAULT_ACCOUNT_NAME: &str = "Main Account";

/// The type given to an account that is provisioned automatically.
pub const DEFAULT_ACCOUNT_TYPE: &str = "checking";

/// The credit limit given to an account that is provisioned automatically.
pub const DEFAULT_CREDIT_LIMIT: f64 = 1000.0;

/// A bank account or credit card belonging to one user.
///
/// The balance is a derived cache: it must always equal the sum of all
/// transaction amounts posted against the account. The ledger store maintains
/// it incrementally on every append; a full recomputation from the transaction
/// table must yield the same value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The ID for the account.
    pub id: AccountId,
    /// The ID of the user that owns the account.
    pub user_id: UserID,
    /// The name of the account.
    pub name: String,
    /// The kind of account, e.g. "checking".
    pub account_type: String,
    /// The cached running balance, signed.
    pub balance: f64,
    /// The credit limit for the account, non-negative.
    pub credit_limit: f64,
}
