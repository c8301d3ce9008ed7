//! Account records: registered users, churned users and the waitlist.
//!
//! Derived values (current subscription, expiry, activity, business
//! profile) are computed on demand from the stored fields and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credential::{Credential, CryptoError, PasswordReset};
use crate::entitlement;
use crate::lenient;
use crate::profile::{self, BusinessProfile, LinkedAccount};
use crate::public::{PotentialCustomerView, PublicUser};
use crate::subscription::Subscription;
use crate::types::{
    Email, PotentialCustomerId, Provider, RoleSet, UnregisteredUserId, UserId, WaitingUserId,
};
use crate::validation::ValidationError;

/// Catalog layout profile of a merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    #[default]
    Standard,
    Supermarket,
}

/// A registered merchant account.
///
/// `User` can be loaded from a stored record but is deliberately not
/// `Serialize`: the only serializable view is [`PublicUser`], which drops
/// the credential.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Assigned by the store on insert.
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub username: Option<String>,
    /// Marks accounts used for testing.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub test: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub roles: RoleSet,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub provider: Provider,
    #[serde(flatten)]
    credential: Credential,
    #[serde(flatten)]
    password_reset: PasswordReset,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub subscriptions: Vec<Subscription>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub accounts: Vec<LinkedAccount>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub profile: ProfileKind,
    #[serde(default)]
    pub stripe_id: Option<String>,
    #[serde(default)]
    pub paypal_id: Option<String>,
    #[serde(default)]
    pub shopify_theme_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// A new, unsaved user with the baseline role set and no password.
    #[must_use]
    pub fn new(name: impl Into<String>, email: Email, provider: Provider) -> Self {
        Self {
            id: None,
            name: name.into(),
            email,
            username: None,
            test: false,
            roles: RoleSet::default(),
            provider,
            credential: Credential::default(),
            password_reset: PasswordReset::default(),
            subscriptions: Vec::new(),
            accounts: Vec::new(),
            profile: ProfileKind::default(),
            stripe_id: None,
            paypal_id: None,
            shopify_theme_id: None,
            created_at: None,
        }
    }

    // =========================================================================
    // Credential
    // =========================================================================

    /// The stored credential.
    #[must_use]
    pub const fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Replace the credential with a fresh salt and the hash of `password`.
    ///
    /// The new credential is fully built before it is assigned, so a
    /// failure leaves the previous credential in place. A pending password
    /// reset is cancelled.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError` if the salt cannot be generated.
    pub fn set_password(&mut self, password: &str) -> Result<(), CryptoError> {
        self.credential = Credential::from_password(password)?;
        self.password_reset = PasswordReset::default();
        Ok(())
    }

    /// The pending password reset, if any.
    #[must_use]
    pub const fn password_reset(&self) -> &PasswordReset {
        &self.password_reset
    }

    /// Issue a password reset token valid from `now`, replacing any
    /// pending one. Returns the token to deliver to the account owner.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError` if the token cannot be generated.
    pub fn begin_password_reset(&mut self, now: DateTime<Utc>) -> Result<String, CryptoError> {
        let reset = PasswordReset::issue(now)?;
        let token = reset.token().unwrap_or_default().to_owned();
        self.password_reset = reset;
        Ok(token)
    }

    /// Check `plaintext` against the stored credential.
    #[must_use]
    pub fn authenticate(&self, plaintext: &str) -> bool {
        self.credential.authenticate(plaintext)
    }

    /// Save-time validation of the record.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::BlankPassword` for a local account
    /// without a password.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.credential.validate(&self.provider)
    }

    /// Fill `created_at` if it has not been set.
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        self.created_at.get_or_insert(now);
    }

    // =========================================================================
    // Authorization
    // =========================================================================

    /// Whether the user holds `role`, directly or as an admin.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.has_role(role)
    }

    /// Whether the user is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.is_admin()
    }

    // =========================================================================
    // Entitlement
    // =========================================================================

    /// The subscription with the latest start date.
    #[must_use]
    pub fn current_subscription(&self) -> Option<&Subscription> {
        entitlement::current_subscription(&self.subscriptions)
    }

    /// Whether the current subscription had ended at `now`.
    #[must_use]
    pub fn has_expired_at(&self, now: DateTime<Utc>) -> bool {
        entitlement::has_expired_at(&self.subscriptions, now)
    }

    /// Whether the current subscription has ended.
    #[must_use]
    pub fn has_expired(&self) -> bool {
        entitlement::has_expired(&self.subscriptions)
    }

    /// Whether any subscription is flagged active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        entitlement::is_active(&self.subscriptions)
    }

    // =========================================================================
    // Business profile
    // =========================================================================

    /// Business name and address from the linked accounts.
    #[must_use]
    pub fn business_profile(&self) -> BusinessProfile {
        profile::aggregate(&self.accounts)
    }

    /// Business name from the linked accounts.
    #[must_use]
    pub fn business_name(&self) -> String {
        profile::business_name(&self.accounts)
    }

    /// Address from the linked accounts.
    #[must_use]
    pub fn address(&self) -> String {
        profile::address(&self.accounts)
    }

    /// The externally visible view of this user, with derived fields
    /// evaluated at `now`.
    #[must_use]
    pub fn to_safe_view(&self, now: DateTime<Utc>) -> PublicUser {
        PublicUser::from_user(self, now)
    }
}

/// Snapshot kept when a user closes their account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnregisteredUser {
    #[serde(default)]
    pub id: Option<UnregisteredUserId>,
    pub email: Email,
    #[serde(default)]
    pub paypal_email: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl UnregisteredUser {
    /// Snapshot `user` with the given closure reason. `closed_at` is left
    /// unset; [`UnregisteredUser::stamp`] fills it on save.
    #[must_use]
    pub fn from_user(user: &User, reason: Option<String>) -> Self {
        Self {
            id: None,
            email: user.email.clone(),
            paypal_email: None,
            kind: None,
            reason,
            subscriptions: user.subscriptions.clone(),
            created_at: user.created_at,
            closed_at: None,
        }
    }

    /// Fill `closed_at` if it has not been set. An explicit value is kept.
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        self.closed_at.get_or_insert(now);
    }

    /// The subscription with the latest start date.
    #[must_use]
    pub fn current_subscription(&self) -> Option<&Subscription> {
        entitlement::current_subscription(&self.subscriptions)
    }
}

/// Someone waiting for access to a platform integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingUser {
    #[serde(default)]
    pub id: Option<WaitingUserId>,
    #[serde(default)]
    pub platform: Option<String>,
    pub email: Email,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl WaitingUser {
    /// A new, unsaved waitlist entry.
    #[must_use]
    pub const fn new(email: Email, platform: Option<String>) -> Self {
        Self {
            id: None,
            platform,
            email,
            created_at: None,
        }
    }

    /// Fill `created_at` if it has not been set.
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        self.created_at.get_or_insert(now);
    }
}

/// A merchant contacted by sales before signing up.
///
/// Names are stored as entered. [`PotentialCustomer::to_view`] escapes them
/// for display.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PotentialCustomer {
    #[serde(default)]
    pub id: Option<PotentialCustomerId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub slug: Option<String>,
    pub email: Email,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address_line_1: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address_line_2: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub city: Option<String>,
}

impl PotentialCustomer {
    /// A new, unsaved lead with only an email.
    #[must_use]
    pub const fn new(email: Email) -> Self {
        Self {
            id: None,
            name: None,
            business_name: None,
            slug: None,
            email,
            phone: None,
            address_line_1: None,
            address_line_2: None,
            postal_code: None,
            city: None,
        }
    }

    /// The display view with `name` and `business_name` escaped.
    #[must_use]
    pub fn to_view(&self) -> PotentialCustomerView {
        PotentialCustomerView::from_customer(self)
    }
}
