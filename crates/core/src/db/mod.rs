//! Persistence contracts for account records.
//!
//! The core depends only on these narrow traits, never on a particular
//! storage technology. Implementations must enforce email uniqueness
//! themselves (a unique index, or the lock in [`InMemoryStore`]) and report
//! a violation as [`RepositoryError::Conflict`]: the advisory
//! `count_by_email_excluding` lookup the service performs first is racy
//! between concurrent registrations and is never the final word.
//!
//! User writes replace the whole record, so a credential is never stored
//! half-updated.

mod memory;

pub use memory::InMemoryStore;

use thiserror::Error;

use crate::types::{Email, PotentialCustomerId, UserId};
use crate::user::{PotentialCustomer, UnregisteredUser, User, WaitingUser};

/// Errors from a persistence collaborator.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Storage of registered users.
pub trait UserRepository {
    /// Number of users with `email`, not counting `exclude`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the lookup fails.
    fn count_by_email_excluding(
        &self,
        email: &Email,
        exclude: Option<UserId>,
    ) -> Result<usize, RepositoryError>;

    /// Load a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the lookup fails.
    fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Load a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the lookup fails.
    fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Load the user holding the password reset `token`, expired or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the lookup fails.
    fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, RepositoryError>;

    /// Insert a new user and return it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    fn insert(&self, user: User) -> Result<User, RepositoryError>;

    /// Replace a stored user with `user`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `user` has no stored record.
    /// Returns `RepositoryError::Conflict` if the new email is taken.
    fn update(&self, user: &User) -> Result<(), RepositoryError>;

    /// Delete a user. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the delete fails.
    fn delete(&self, id: UserId) -> Result<bool, RepositoryError>;
}

/// Storage of account-closure snapshots.
pub trait UnregisteredUserRepository {
    /// Insert a snapshot and return it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the insert fails.
    fn insert_unregistered(
        &self,
        record: UnregisteredUser,
    ) -> Result<UnregisteredUser, RepositoryError>;

    /// All snapshots recorded for `email`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the lookup fails.
    fn list_unregistered_by_email(
        &self,
        email: &Email,
    ) -> Result<Vec<UnregisteredUser>, RepositoryError>;
}

/// Storage of waitlist entries.
pub trait WaitingUserRepository {
    /// Number of waitlist entries with `email`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the lookup fails.
    fn count_waiting_by_email(&self, email: &Email) -> Result<usize, RepositoryError>;

    /// Insert an entry and return it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already waiting.
    fn insert_waiting(&self, entry: WaitingUser) -> Result<WaitingUser, RepositoryError>;
}

/// Storage of sales leads.
pub trait PotentialCustomerRepository {
    /// Number of leads with `email`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the lookup fails.
    fn count_potential_customers_by_email(&self, email: &Email) -> Result<usize, RepositoryError>;

    /// Load a lead by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the lookup fails.
    fn get_potential_customer(
        &self,
        id: PotentialCustomerId,
    ) -> Result<Option<PotentialCustomer>, RepositoryError>;

    /// Insert a lead and return it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a lead with the same email exists.
    fn insert_potential_customer(
        &self,
        customer: PotentialCustomer,
    ) -> Result<PotentialCustomer, RepositoryError>;
}
