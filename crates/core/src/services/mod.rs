//! Services composing the account logic over a persistence collaborator.

pub mod account;

pub use account::{AccountError, AccountService};
