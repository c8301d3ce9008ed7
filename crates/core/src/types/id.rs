//! Store-assigned record IDs.
//!
//! Each record kind gets its own ID type so a `UserId` can never be used to
//! look up a waitlist entry. IDs are assigned by the persistence
//! collaborator on insert; a record that has not been stored yet carries
//! `None`.

/// Define a `u32` newtype ID.
///
/// The generated type serializes as a bare number, orders numerically,
/// displays as its number and parses from one.
///
/// # Example
///
/// ```rust
/// # use merchant_account_core::define_id;
/// define_id!(
///     /// A connected storefront.
///     ShopId
/// );
///
/// let id: ShopId = "17".parse().unwrap();
/// assert_eq!(id, ShopId::new(17));
/// assert_eq!(id.to_string(), "17");
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// A registered user.
    UserId
);
define_id!(
    /// A closed-account snapshot.
    UnregisteredUserId
);
define_id!(
    /// A waitlist entry.
    WaitingUserId
);
define_id!(
    /// A sales lead that has not signed up.
    PotentialCustomerId
);
