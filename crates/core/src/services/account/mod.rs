//! Account service.
//!
//! Registration, login, password changes and resets, account closure and
//! lead capture over an injected repository.

mod error;

pub use error::AccountError;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::db::{
    PotentialCustomerRepository, RepositoryError, UnregisteredUserRepository, UserRepository,
    WaitingUserRepository,
};
use crate::public::PublicUser;
use crate::types::{Email, Provider, UserId};
use crate::user::{PotentialCustomer, UnregisteredUser, User, WaitingUser};
use crate::validation::ValidationError;

/// Account service.
///
/// Handles registration, login and lifecycle operations for merchant accounts.
pub struct AccountService<'a, R> {
    repo: &'a R,
}

impl<'a, R> AccountService<'a, R> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(repo: &'a R) -> Self {
        Self { repo }
    }
}

impl<R: UserRepository> AccountService<'_, R> {
    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new local user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidEmail` if the email format is invalid.
    /// Returns `ValidationError::BlankPassword` if the password is empty.
    /// Returns `ValidationError::DuplicateEmail` if the email is already
    /// registered, whether the advisory lookup or the store caught it.
    /// Returns `AccountError::Crypto` if the salt cannot be generated.
    pub fn register_local(
        &self,
        name: &str,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<User, AccountError> {
        let email = Email::parse(email).map_err(ValidationError::from)?;

        let mut user = User::new(name, email, Provider::Local);
        user.set_password(password)?;
        self.save_new(user, now)
    }

    /// Register a new user authenticated by an OAuth provider.
    ///
    /// No password is required.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidEmail` if the email format is invalid.
    /// Returns `ValidationError::BlankPassword` if `provider` is local.
    /// Returns `ValidationError::DuplicateEmail` if the email is already registered.
    pub fn register_oauth(
        &self,
        name: &str,
        email: &str,
        provider: Provider,
        now: DateTime<Utc>,
    ) -> Result<User, AccountError> {
        let email = Email::parse(email).map_err(ValidationError::from)?;
        self.save_new(User::new(name, email, provider), now)
    }

    fn save_new(&self, mut user: User, now: DateTime<Utc>) -> Result<User, AccountError> {
        user.validate()?;

        if self.repo.count_by_email_excluding(&user.email, user.id)? > 0 {
            debug!(email = %user.email, "Email already registered");
            return Err(ValidationError::DuplicateEmail.into());
        }

        user.stamp(now);
        let user = self.repo.insert(user).map_err(duplicate_email)?;

        info!(user_id = ?user.id, provider = %user.provider, "Registered user");
        Ok(user)
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidEmail` if the email format is invalid.
    /// Returns `AccountError::InvalidCredentials` if the email/password is wrong.
    pub fn login(&self, email: &str, password: &str) -> Result<User, AccountError> {
        let email = Email::parse(email).map_err(ValidationError::from)?;

        let user = self
            .repo
            .find_by_email(&email)?
            .ok_or(AccountError::InvalidCredentials)?;

        if !user.authenticate(password) {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Replace a user's password.
    ///
    /// The new salt and hash are written together in one record update.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::UserNotFound` if the user doesn't exist.
    /// Returns `ValidationError::BlankPassword` if a local user's password is empty.
    pub fn change_password(&self, user_id: UserId, password: &str) -> Result<User, AccountError> {
        let mut user = self.get_user(user_id)?;
        user.set_password(password)?;
        user.validate()?;
        self.write_user(&user)?;

        info!(%user_id, "Password changed");
        Ok(user)
    }

    // =========================================================================
    // Password Reset
    // =========================================================================

    /// Issue a password reset token for the user registered under `email`.
    ///
    /// The token is valid for one hour from `now`. Issuing a new token
    /// replaces any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidEmail` if the email format is invalid.
    /// Returns `AccountError::UserNotFound` if no user has that email.
    /// Returns `AccountError::Crypto` if the token cannot be generated.
    pub fn request_password_reset(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AccountError> {
        let email = Email::parse(email).map_err(ValidationError::from)?;

        let mut user = self
            .repo
            .find_by_email(&email)?
            .ok_or(AccountError::UserNotFound)?;
        let token = user.begin_password_reset(now)?;
        self.write_user(&user)?;

        info!(user_id = ?user.id, "Password reset requested");
        Ok(token)
    }

    /// Set a new password using a reset token issued by
    /// [`AccountService::request_password_reset`].
    ///
    /// The token is consumed: the stored record no longer holds it.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidResetToken` if no user holds `token` or
    /// it expired at or before `now`.
    /// Returns `ValidationError::BlankPassword` if a local user's password is empty.
    pub fn reset_password(
        &self,
        token: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<User, AccountError> {
        let mut user = self
            .repo
            .find_by_reset_token(token)?
            .ok_or(AccountError::InvalidResetToken)?;

        if !user.password_reset().accepts(token, now) {
            debug!(user_id = ?user.id, "Password reset token expired");
            return Err(AccountError::InvalidResetToken);
        }

        user.set_password(password)?;
        user.validate()?;
        self.write_user(&user)?;

        info!(user_id = ?user.id, "Password reset");
        Ok(user)
    }

    fn write_user(&self, user: &User) -> Result<(), AccountError> {
        self.repo.update(user).map_err(|e| match e {
            RepositoryError::NotFound => AccountError::UserNotFound,
            other => duplicate_email(other),
        })
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::UserNotFound` if the user doesn't exist.
    pub fn get_user(&self, user_id: UserId) -> Result<User, AccountError> {
        self.repo.get(user_id)?.ok_or(AccountError::UserNotFound)
    }

    /// The public view of a user, with derived fields evaluated at `now`.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::UserNotFound` if the user doesn't exist.
    pub fn public_view(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<PublicUser, AccountError> {
        Ok(self.get_user(user_id)?.to_safe_view(now))
    }
}

impl<R: UserRepository + UnregisteredUserRepository> AccountService<'_, R> {
    /// Close an account.
    ///
    /// Records an [`UnregisteredUser`] snapshot of the email and
    /// subscription history, then deletes the user.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::UserNotFound` if the user doesn't exist.
    pub fn close_account(
        &self,
        user_id: UserId,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<UnregisteredUser, AccountError> {
        let user = self.get_user(user_id)?;

        let mut snapshot = UnregisteredUser::from_user(&user, reason);
        snapshot.stamp(now);
        let snapshot = self.repo.insert_unregistered(snapshot)?;

        if !self.repo.delete(user_id)? {
            warn!(%user_id, "User vanished while closing account");
        }

        info!(%user_id, "Closed account");
        Ok(snapshot)
    }
}

impl<R: WaitingUserRepository> AccountService<'_, R> {
    /// Add an email to the waitlist for `platform`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidEmail` if the email format is invalid.
    /// Returns `ValidationError::DuplicateEmail` if the email is already waiting.
    pub fn join_waitlist(
        &self,
        email: &str,
        platform: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<WaitingUser, AccountError> {
        let email = Email::parse(email).map_err(ValidationError::from)?;

        if self.repo.count_waiting_by_email(&email)? > 0 {
            return Err(ValidationError::DuplicateEmail.into());
        }

        let mut entry = WaitingUser::new(email, platform);
        entry.stamp(now);
        let entry = self.repo.insert_waiting(entry).map_err(duplicate_email)?;

        info!(waiting_user_id = ?entry.id, "Joined waitlist");
        Ok(entry)
    }
}

impl<R: PotentialCustomerRepository> AccountService<'_, R> {
    /// Record a sales lead.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::DuplicateEmail` if a lead with the same
    /// email was already recorded.
    pub fn record_potential_customer(
        &self,
        customer: PotentialCustomer,
    ) -> Result<PotentialCustomer, AccountError> {
        if self
            .repo
            .count_potential_customers_by_email(&customer.email)?
            > 0
        {
            return Err(ValidationError::DuplicateEmail.into());
        }

        let customer = self
            .repo
            .insert_potential_customer(customer)
            .map_err(duplicate_email)?;

        info!(potential_customer_id = ?customer.id, "Recorded potential customer");
        Ok(customer)
    }
}

/// Map a store-level uniqueness violation to the field-level rejection.
fn duplicate_email(e: RepositoryError) -> AccountError {
    match e {
        RepositoryError::Conflict(detail) => {
            warn!(%detail, "Store rejected duplicate email after advisory check");
            ValidationError::DuplicateEmail.into()
        }
        other => AccountError::Repository(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::db::InMemoryStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap()
    }

    /// A store whose advisory lookup always says "unique", as if a
    /// concurrent registration had not committed yet.
    struct StaleLookup(InMemoryStore);

    impl UserRepository for StaleLookup {
        fn count_by_email_excluding(
            &self,
            _email: &Email,
            _exclude: Option<UserId>,
        ) -> Result<usize, RepositoryError> {
            Ok(0)
        }
        fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
            self.0.get(id)
        }
        fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
            self.0.find_by_email(email)
        }
        fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
            self.0.find_by_reset_token(token)
        }
        fn insert(&self, user: User) -> Result<User, RepositoryError> {
            self.0.insert(user)
        }
        fn update(&self, user: &User) -> Result<(), RepositoryError> {
            self.0.update(user)
        }
        fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
            self.0.delete(id)
        }
    }

    #[test]
    fn test_register_and_login() {
        let store = InMemoryStore::new();
        let service = AccountService::new(&store);

        let user = service
            .register_local("Ada", "ada@example.com", "s3cret-pass", now())
            .unwrap();
        assert!(user.id.is_some());
        assert_eq!(user.created_at, Some(now()));
        assert!(user.has_role("authenticated"));

        let logged_in = service.login("ada@example.com", "s3cret-pass").unwrap();
        assert_eq!(logged_in.id, user.id);

        assert!(matches!(
            service.login("ada@example.com", "wrong"),
            Err(AccountError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("nobody@example.com", "s3cret-pass"),
            Err(AccountError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_register_rejects_blank_password_and_bad_email() {
        let store = InMemoryStore::new();
        let service = AccountService::new(&store);

        assert!(matches!(
            service.register_local("Ada", "ada@example.com", "", now()),
            Err(AccountError::Validation(ValidationError::BlankPassword))
        ));
        assert!(matches!(
            service.register_local("Ada", "not-an-email", "pw", now()),
            Err(AccountError::Validation(ValidationError::InvalidEmail(_)))
        ));
    }

    #[test]
    fn test_register_oauth_needs_no_password() {
        let store = InMemoryStore::new();
        let service = AccountService::new(&store);

        let user = service
            .register_oauth("Grace", "grace@example.com", Provider::Github, now())
            .unwrap();
        assert!(user.credential().is_empty());
        assert!(matches!(
            service.login("grace@example.com", ""),
            Err(AccountError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_duplicate_email_caught_by_advisory_lookup() {
        let store = InMemoryStore::new();
        let service = AccountService::new(&store);

        service
            .register_local("Ada", "ada@example.com", "pw-one", now())
            .unwrap();
        let err = service
            .register_local("Ada2", "ada@example.com", "pw-two", now())
            .unwrap_err();
        assert!(err.is_duplicate_email());
    }

    #[test]
    fn test_duplicate_email_caught_by_store_constraint() {
        let store = StaleLookup(InMemoryStore::new());
        let service = AccountService::new(&store);

        service
            .register_local("Ada", "ada@example.com", "pw-one", now())
            .unwrap();
        let err = service
            .register_local("Ada2", "ada@example.com", "pw-two", now())
            .unwrap_err();
        assert!(err.is_duplicate_email());
    }

    #[test]
    fn test_change_password() {
        let store = InMemoryStore::new();
        let service = AccountService::new(&store);

        let user = service
            .register_local("Ada", "ada@example.com", "old-pass", now())
            .unwrap();
        let id = user.id.unwrap();

        service.change_password(id, "new-pass").unwrap();
        assert!(service.login("ada@example.com", "new-pass").is_ok());
        assert!(service.login("ada@example.com", "old-pass").is_err());

        assert!(matches!(
            service.change_password(id, ""),
            Err(AccountError::Validation(ValidationError::BlankPassword))
        ));
        assert!(service.login("ada@example.com", "new-pass").is_ok());

        assert!(matches!(
            service.change_password(UserId::new(999), "x"),
            Err(AccountError::UserNotFound)
        ));
    }

    #[test]
    fn test_close_account() {
        let store = InMemoryStore::new();
        let service = AccountService::new(&store);

        let user = service
            .register_local("Ada", "ada@example.com", "pw", now())
            .unwrap();
        let id = user.id.unwrap();

        let snapshot = service
            .close_account(id, Some("moving on".to_owned()), now())
            .unwrap();
        assert_eq!(snapshot.closed_at, Some(now()));
        assert_eq!(snapshot.reason.as_deref(), Some("moving on"));
        assert!(matches!(
            service.get_user(id),
            Err(AccountError::UserNotFound)
        ));

        let email = Email::parse("ada@example.com").unwrap();
        assert_eq!(store.list_unregistered_by_email(&email).unwrap().len(), 1);

        // The email is free again once the account is closed.
        assert!(
            service
                .register_local("Ada", "ada@example.com", "pw", now())
                .is_ok()
        );
    }

    #[test]
    fn test_join_waitlist() {
        let store = InMemoryStore::new();
        let service = AccountService::new(&store);

        let entry = service
            .join_waitlist("wait@example.com", Some("etsy".to_owned()), now())
            .unwrap();
        assert_eq!(entry.created_at, Some(now()));
        assert!(
            service
                .join_waitlist("wait@example.com", None, now())
                .unwrap_err()
                .is_duplicate_email()
        );
    }

    #[test]
    fn test_public_view() {
        let store = InMemoryStore::new();
        let service = AccountService::new(&store);

        let user = service
            .register_local("Ada", "ada@example.com", "pw", now())
            .unwrap();
        let view = service.public_view(user.id.unwrap(), now()).unwrap();
        let json = serde_json::to_value(view).unwrap();
        assert!(json.get("salt").is_none());
        assert!(json.get("hashed_password").is_none());
    }

    #[test]
    fn test_password_reset_flow() {
        let store = InMemoryStore::new();
        let service = AccountService::new(&store);
        let user = service
            .register_local("Ada", "ada@example.com", "old-pass", now())
            .unwrap();

        let token = service
            .request_password_reset("ada@example.com", now())
            .unwrap();
        let reset = service
            .reset_password(&token, "new-pass", now() + chrono::TimeDelta::minutes(30))
            .unwrap();
        assert_eq!(reset.id, user.id);
        assert!(service.login("ada@example.com", "new-pass").is_ok());
        assert!(matches!(
            service.login("ada@example.com", "old-pass"),
            Err(AccountError::InvalidCredentials)
        ));

        // Tokens are single use.
        assert!(matches!(
            service.reset_password(&token, "again", now()),
            Err(AccountError::InvalidResetToken)
        ));
    }

    #[test]
    fn test_password_reset_rejections() {
        let store = InMemoryStore::new();
        let service = AccountService::new(&store);
        service
            .register_local("Ada", "ada@example.com", "old-pass", now())
            .unwrap();

        assert!(matches!(
            service.request_password_reset("nobody@example.com", now()),
            Err(AccountError::UserNotFound)
        ));
        assert!(matches!(
            service.reset_password("unknown", "new-pass", now()),
            Err(AccountError::InvalidResetToken)
        ));

        let token = service
            .request_password_reset("ada@example.com", now())
            .unwrap();
        assert!(matches!(
            service.reset_password(&token, "", now()),
            Err(AccountError::Validation(ValidationError::BlankPassword))
        ));
        assert!(matches!(
            service.reset_password(&token, "new-pass", now() + chrono::TimeDelta::hours(1)),
            Err(AccountError::InvalidResetToken)
        ));
        assert!(service.login("ada@example.com", "old-pass").is_ok());
    }

    #[test]
    fn test_record_potential_customer() {
        let store = InMemoryStore::new();
        let service = AccountService::new(&store);
        let email = Email::parse("lead@example.com").unwrap();

        let lead = service
            .record_potential_customer(PotentialCustomer::new(email.clone()))
            .unwrap();
        assert!(lead.id.is_some());

        let err = service
            .record_potential_customer(PotentialCustomer::new(email))
            .unwrap_err();
        assert!(err.is_duplicate_email());
    }
}
