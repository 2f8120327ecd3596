//! This file defines a user of the application and its supporting types.
//!
//! The ledger references users but never mutates them. The password credential
//! is an opaque string hashed by the embedding application; this crate stores
//! and returns it without interpretation.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better
/// compile time errors, and more flexible generics that can have distinct
/// implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Wrap a raw database ID as a user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw database ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application: the identity anchor every account, transaction,
/// and credit score record hangs off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserID,
    email: String,
    display_name: String,
    password_hash: String,
}

impl User {
    /// Construct a user from its parts.
    ///
    /// This does not insert the user into the database, see
    /// [UserStore::create](crate::UserStore::create).
    pub fn new(id: UserID, email: String, display_name: String, password_hash: String) -> Self {
        Self {
            id,
            email,
            display_name,
            password_hash,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The email address associated with the user.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The unique name the user is displayed as.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The user's password hash, opaque to this crate.
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// The data required to create a new [User].
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The user's email address, unique across users.
    pub email: String,
    /// The name the user is displayed as, unique across users.
    pub display_name: String,
    /// The already-hashed password credential.
    pub password_hash: String,
}
