//! Merchant Account Core - credential, entitlement and profile logic.
//!
//! This crate models a merchant-platform account: identity, password
//! credentials, subscription entitlement over time, and a business profile
//! derived from linked third-party storefront accounts (Etsy, Shopify,
//! BigCommerce, Ecwid, Magento, ...).
//!
//! # Architecture
//!
//! Everything except [`services`] and [`db`] is pure, synchronous logic over
//! in-memory values. Persistence is a collaborator reached through the
//! traits in [`db`], injected into [`services::AccountService`].
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, providers and roles
//! - [`credential`] - Salt generation, password hashing and verification
//! - [`entitlement`] - Current subscription, expiry and activity
//! - [`profile`] - Business name and address from linked accounts
//! - [`user`] - Account records and their derived fields
//! - [`public`] - The only serializable user view
//! - [`db`] - Repository contracts and an in-memory store
//! - [`services`] - Registration, login and account lifecycle

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod credential;
pub mod db;
pub mod entitlement;
mod lenient;
pub mod profile;
pub mod public;
pub mod services;
pub mod subscription;
pub mod text;
pub mod types;
pub mod user;
pub mod validation;

pub use credential::{Credential, CryptoError};
pub use profile::{BusinessProfile, LinkedAccount, ProfileSource};
pub use public::{PotentialCustomerView, PublicUser};
pub use subscription::Subscription;
pub use types::*;
pub use user::{PotentialCustomer, UnregisteredUser, User, WaitingUser};
pub use validation::ValidationError;
