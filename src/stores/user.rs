//! Defines the user store trait.

use crate::{
    Error,
    models::{NewUser, User, UserID},
};

/// Handles the creation and retrieval of users.
pub trait UserStore {
    /// Create a new user and add it to the store.
    ///
    /// Implementers must provision the user's default account and an initial
    /// credit score record so that the first transaction append and snapshot
    /// find a consistent ledger.
    ///
    /// # Errors
    /// Returns [Error::DuplicateEmail] or [Error::DuplicateUsername] if the
    /// email or display name is already taken.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has the given ID.
    fn get(&self, user_id: UserID) -> Result<User, Error>;

    /// Get a user by their email address.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has the given email.
    fn get_by_email(&self, email: &str) -> Result<User, Error>;
}
