//! Integration tests for merchant accounts.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p merchant-account-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `account_lifecycle` - Registration, login, password change, closing
//! - `entitlement` - Current subscription and expiry over stored records
//! - `business_profile` - Business name and address from linked accounts
//! - `public_view` - The serialized user never leaks the credential
//!
//! Shared fixtures live here so every test file builds records the same way.

use chrono::{DateTime, TimeZone, Utc};
use merchant_account_core::User;
use serde_json::Value;

/// Midnight UTC on the given date.
///
/// # Panics
///
/// Panics if the date is invalid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// Load a user record from its stored JSON form.
///
/// # Panics
///
/// Panics if the record does not deserialize.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn user_from_json(record: Value) -> User {
    serde_json::from_value(record).unwrap()
}
