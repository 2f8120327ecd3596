//! This file defines the `Category` type. A category acts like a tag for a
//! transaction, however a transaction may only have one category.

use serde::{Deserialize, Serialize};

use crate::{Error, models::DatabaseID};

/// The category a transaction falls back to when it is income and no valid
/// category was supplied.
pub const DEFAULT_INCOME_CATEGORY: (DatabaseID, &str) = (1, "Salary");

/// The category a transaction falls back to when it is an expense and no valid
/// category was supplied.
pub const DEFAULT_EXPENSE_CATEGORY: (DatabaseID, &str) = (2, "Other Expense");

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    /// This function will return [Error::EmptyCategoryName] if `name` is an
    /// empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty. This function has
    /// `_unchecked` in the name but is not `unsafe`, because a violated
    /// invariant causes incorrect behaviour but does not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A label describing the type of a transaction, e.g. "Salary" or "Groceries".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The ID for the category.
    pub id: DatabaseID,
    /// The display name of the category.
    pub name: CategoryName,
}
