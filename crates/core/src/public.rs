//! The externally visible record representations.
//!
//! Every serialization boundary must go through [`PublicUser`] or
//! [`PotentialCustomerView`]. `PublicUser` carries every stored user field
//! except the credential and any pending password reset, plus the derived
//! fields a consumer may request.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::profile::LinkedAccount;
use crate::subscription::Subscription;
use crate::text::escape_html;
use crate::types::{Email, PotentialCustomerId, Provider, RoleSet, UserId};
use crate::user::{PotentialCustomer, ProfileKind, User};

/// A user with the salt and password hash removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: Option<UserId>,
    /// HTML-escaped display name.
    pub name: String,
    pub email: Email,
    /// HTML-escaped username.
    pub username: Option<String>,
    pub test: bool,
    pub roles: RoleSet,
    pub provider: Provider,
    pub subscriptions: Vec<Subscription>,
    pub accounts: Vec<LinkedAccount>,
    pub profile: ProfileKind,
    pub stripe_id: Option<String>,
    pub paypal_id: Option<String>,
    pub shopify_theme_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,

    // Derived
    pub subscription: Option<Subscription>,
    pub has_expired: bool,
    pub is_active: bool,
    pub business_name: String,
    pub address: String,
}

impl PublicUser {
    /// Build the public view of `user`, evaluating expiry at `now`.
    #[must_use]
    pub fn from_user(user: &User, now: DateTime<Utc>) -> Self {
        let business = user.business_profile();
        Self {
            id: user.id,
            name: escape_html(&user.name),
            email: user.email.clone(),
            username: user.username.as_deref().map(escape_html),
            test: user.test,
            roles: user.roles.clone(),
            provider: user.provider.clone(),
            subscriptions: user.subscriptions.clone(),
            accounts: user.accounts.clone(),
            profile: user.profile,
            stripe_id: user.stripe_id.clone(),
            paypal_id: user.paypal_id.clone(),
            shopify_theme_id: user.shopify_theme_id.clone(),
            created_at: user.created_at,
            subscription: user.current_subscription().cloned(),
            has_expired: user.has_expired_at(now),
            is_active: user.is_active(),
            business_name: business.business_name,
            address: business.address,
        }
    }
}

/// A sales lead with its display names HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PotentialCustomerView {
    pub id: Option<PotentialCustomerId>,
    pub name: String,
    pub business_name: String,
    pub slug: Option<String>,
    pub email: Email,
    pub phone: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
}

impl PotentialCustomerView {
    /// Build the display view of `customer`. Missing names render empty.
    #[must_use]
    pub fn from_customer(customer: &PotentialCustomer) -> Self {
        Self {
            id: customer.id,
            name: escape_html(customer.name.as_deref().unwrap_or_default()),
            business_name: escape_html(customer.business_name.as_deref().unwrap_or_default()),
            slug: customer.slug.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            address_line_1: customer.address_line_1.clone(),
            address_line_2: customer.address_line_2.clone(),
            postal_code: customer.postal_code.clone(),
            city: customer.city.clone(),
        }
    }
}
