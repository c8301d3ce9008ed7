//! Password credentials: salt generation, key derivation and verification.
//!
//! # Stored format
//!
//! Both the salt and the derived hash are stored as standard base64 text.
//! The hash is PBKDF2-HMAC-SHA1 over the password, keyed with the *decoded*
//! salt bytes, using [`PBKDF2_ITERATIONS`] rounds and a [`DERIVED_KEY_LEN`]
//! byte output. These parameters are part of every stored credential:
//! changing any of them makes all existing credentials unverifiable.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::{DateTime, TimeDelta, Utc};
use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use sha1::Sha1;
use thiserror::Error;
use tracing::warn;

use crate::lenient;
use crate::types::Provider;
use crate::validation::ValidationError;

/// PBKDF2 round count of the stored format.
pub const PBKDF2_ITERATIONS: u32 = 10_000;

/// Length in bytes of the derived key before base64 encoding.
pub const DERIVED_KEY_LEN: usize = 64;

/// Length in bytes of a freshly generated salt before base64 encoding.
pub const SALT_LEN: usize = 16;

/// Length in bytes of a password reset token before encoding.
pub const RESET_TOKEN_LEN: usize = 20;

/// How long a password reset token stays valid.
pub const RESET_TOKEN_TTL: TimeDelta = TimeDelta::hours(1);

/// Errors that prevent a credential from being produced or checked.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The operating system random source failed.
    #[error("random source failure: {0}")]
    RandomSource(String),

    /// A stored salt is not valid base64.
    #[error("stored salt is not valid base64: {0}")]
    MalformedSalt(#[from] base64::DecodeError),
}

/// Generate a fresh random salt, base64 encoded for storage.
///
/// # Errors
///
/// Returns `CryptoError::RandomSource` if the OS random source fails.
pub fn make_salt() -> Result<String, CryptoError> {
    Ok(STANDARD.encode(random_bytes::<SALT_LEN>()?))
}

fn random_bytes<const N: usize>() -> Result<[u8; N], CryptoError> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::RandomSource(e.to_string()))?;
    Ok(bytes)
}

/// Derive the stored hash of `password` under `salt`.
///
/// Returns an empty string when either input is empty: that is the
/// "no credential" value, not an error.
///
/// # Errors
///
/// Returns `CryptoError::MalformedSalt` if `salt` is not valid base64.
pub fn hash_password(password: &str, salt: &str) -> Result<String, CryptoError> {
    if password.is_empty() || salt.is_empty() {
        return Ok(String::new());
    }

    let salt = STANDARD.decode(salt)?;
    let mut key = [0u8; DERIVED_KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha1>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut key);
    Ok(STANDARD.encode(key))
}

/// A salt and the hash derived from it.
///
/// The two fields are only ever written together, by building a whole new
/// `Credential` (see [`Credential::from_password`]). There is no way to
/// update one without the other.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credential {
    #[serde(default, deserialize_with = "lenient::or_default")]
    salt: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    hashed_password: String,
}

impl Credential {
    /// Build a credential for `password` with a freshly generated salt.
    ///
    /// An empty password yields a credential with an empty hash, which
    /// [`Credential::validate`] rejects for local accounts.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError` if the salt cannot be generated.
    pub fn from_password(password: &str) -> Result<Self, CryptoError> {
        let salt = make_salt()?;
        let hashed_password = hash_password(password, &salt)?;
        Ok(Self {
            salt,
            hashed_password,
        })
    }

    /// Rebuild a credential from its stored parts.
    #[must_use]
    pub const fn from_parts(salt: String, hashed_password: String) -> Self {
        Self {
            salt,
            hashed_password,
        }
    }

    /// The stored base64 salt.
    #[must_use]
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// The stored base64 hash.
    #[must_use]
    pub fn hashed_password(&self) -> &str {
        &self.hashed_password
    }

    /// Whether no password has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hashed_password.is_empty()
    }

    /// Check `plaintext` against this credential.
    ///
    /// An empty credential authenticates nothing. The comparison of derived
    /// hashes runs in constant time.
    #[must_use]
    pub fn authenticate(&self, plaintext: &str) -> bool {
        if self.is_empty() {
            return false;
        }

        match hash_password(plaintext, &self.salt) {
            Ok(candidate) => constant_time_eq(candidate.as_bytes(), self.hashed_password.as_bytes()),
            Err(e) => {
                warn!(error = %e, "Stored credential could not be checked");
                false
            }
        }
    }

    /// Presence validation for a credential owned by a `provider` account.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::BlankPassword` when the provider is local and
    /// no password hash is present. Other providers are exempt.
    pub fn validate(&self, provider: &Provider) -> Result<(), ValidationError> {
        if provider.is_local() && self.is_empty() {
            return Err(ValidationError::BlankPassword);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("salt", &"[REDACTED]")
            .field("hashed_password", &"[REDACTED]")
            .field("is_empty", &self.is_empty())
            .finish()
    }
}

/// A pending password reset: a single-use token and its expiry.
///
/// Stored alongside the credential under the record's
/// `resetPasswordToken` / `resetPasswordExpires` keys. The token is a
/// secret: it is redacted from `Debug` and never part of a public view.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PasswordReset {
    #[serde(default, rename = "resetPasswordToken")]
    token: Option<String>,
    #[serde(default, rename = "resetPasswordExpires")]
    expires: Option<DateTime<Utc>>,
}

impl PasswordReset {
    /// Issue a fresh token valid for [`RESET_TOKEN_TTL`] from `now`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::RandomSource` if the OS random source fails.
    pub fn issue(now: DateTime<Utc>) -> Result<Self, CryptoError> {
        Ok(Self {
            token: Some(URL_SAFE_NO_PAD.encode(random_bytes::<RESET_TOKEN_LEN>()?)),
            expires: now.checked_add_signed(RESET_TOKEN_TTL),
        })
    }

    /// The token to hand to the account owner, if a reset is pending.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// When the pending token stops being accepted.
    #[must_use]
    pub const fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    /// Whether `candidate` is the pending token and it has not expired.
    ///
    /// A token without an expiry is never accepted.
    #[must_use]
    pub fn accepts(&self, candidate: &str, now: DateTime<Utc>) -> bool {
        match (self.token(), self.expires) {
            (Some(token), Some(expires)) => {
                now < expires && constant_time_eq(token.as_bytes(), candidate.as_bytes())
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for PasswordReset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordReset")
            .field("token", &self.token().map(|_| "[REDACTED]"))
            .field("expires", &self.expires)
            .finish()
    }
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_make_salt_is_16_random_bytes() {
        let a = make_salt().unwrap();
        let b = make_salt().unwrap();
        assert_eq!(STANDARD.decode(&a).unwrap().len(), SALT_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let salt = make_salt().unwrap();
        assert_eq!(
            hash_password("hunter22", &salt).unwrap(),
            hash_password("hunter22", &salt).unwrap()
        );
    }

    #[test]
    fn test_hash_has_stored_length() {
        let hash = hash_password("hunter22", &make_salt().unwrap()).unwrap();
        assert_eq!(STANDARD.decode(hash).unwrap().len(), DERIVED_KEY_LEN);
    }

    #[test]
    fn test_matches_stored_format_vector() {
        // PBKDF2-HMAC-SHA1, 10 000 rounds, 64 bytes, over the decoded
        // salt "saltsaltsaltsalt".
        assert_eq!(
            hash_password("hunter22", "c2FsdHNhbHRzYWx0c2FsdA==").unwrap(),
            "P9lKtkrdEyPh4oxphkdZUFdCPvL2tFUmkTM2L5ESFV3bsV/LnuTPUKkh6GLPRMmhRJ6LjJSLR6dsXkTNtpwCMw=="
        );
    }

    #[test]
    fn test_salts_differentiate_hashes() {
        let first = hash_password("hunter22", &make_salt().unwrap()).unwrap();
        let second = hash_password("hunter22", &make_salt().unwrap()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_password_is_case_sensitive() {
        let salt = STANDARD.encode(b"fixed-salt-bytes");
        assert_ne!(
            hash_password("password", &salt).unwrap(),
            hash_password("Password", &salt).unwrap()
        );
    }

    #[test]
    fn test_empty_inputs_give_empty_hash() {
        assert_eq!(hash_password("", "c2FsdA==").unwrap(), "");
        assert_eq!(hash_password("hunter22", "").unwrap(), "");
    }

    #[test]
    fn test_malformed_salt_is_an_error() {
        assert!(matches!(
            hash_password("hunter22", "not base64!"),
            Err(CryptoError::MalformedSalt(_))
        ));
    }

    #[test]
    fn test_authenticate() {
        let credential = Credential::from_password("correct horse").unwrap();
        assert!(credential.authenticate("correct horse"));
        assert!(!credential.authenticate("correct horsE"));
        assert!(!credential.authenticate(""));
    }

    #[test]
    fn test_empty_credential_authenticates_nothing() {
        let credential = Credential::default();
        assert!(!credential.authenticate(""));
        assert!(!credential.authenticate("anything"));
    }

    #[test]
    fn test_from_password_regenerates_salt() {
        let first = Credential::from_password("same").unwrap();
        let second = Credential::from_password("same").unwrap();
        assert_ne!(first.salt(), second.salt());
        assert_ne!(first.hashed_password(), second.hashed_password());
    }

    #[test]
    fn test_validate_blank_password() {
        let blank = Credential::from_password("").unwrap();
        assert!(blank.is_empty());
        assert!(matches!(
            blank.validate(&Provider::Local),
            Err(ValidationError::BlankPassword)
        ));
        assert!(blank.validate(&Provider::Github).is_ok());

        let set = Credential::from_password("hunter22").unwrap();
        assert!(set.validate(&Provider::Local).is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credential = Credential::from_password("hunter22").unwrap();
        let debug = format!("{credential:?}");
        assert!(!debug.contains(credential.salt()));
        assert!(!debug.contains(credential.hashed_password()));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_password_reset_accepts_until_expiry() {
        let now = Utc::now();
        let reset = PasswordReset::issue(now).unwrap();
        let token = reset.token().unwrap().to_owned();

        assert_eq!(reset.expires(), Some(now + RESET_TOKEN_TTL));
        assert!(reset.accepts(&token, now));
        assert!(!reset.accepts("someone-elses-token", now));
        assert!(!reset.accepts(&token, now + RESET_TOKEN_TTL));
    }

    #[test]
    fn test_password_reset_tokens_are_unique() {
        let now = Utc::now();
        let first = PasswordReset::issue(now).unwrap();
        let second = PasswordReset::issue(now).unwrap();
        assert_ne!(first.token(), second.token());
    }

    #[test]
    fn test_empty_password_reset_accepts_nothing() {
        let reset = PasswordReset::default();
        assert_eq!(reset.token(), None);
        assert!(!reset.accepts("", Utc::now()));
    }

    #[test]
    fn test_password_reset_debug_redacts_token() {
        let reset = PasswordReset::issue(Utc::now()).unwrap();
        let token = reset.token().unwrap().to_owned();
        assert!(!format!("{reset:?}").contains(&token));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(constant_time_eq(b"", b""));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
    }
}
