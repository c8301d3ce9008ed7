//! Core types for merchant accounts.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod provider;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use provider::Provider;
pub use role::RoleSet;
