//! Role membership and the admin override.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Baseline role every user holds.
pub const AUTHENTICATED: &str = "authenticated";

/// Role that implies every other role.
pub const ADMIN: &str = "admin";

/// An unordered set of role names.
///
/// The set is never empty: the baseline [`AUTHENTICATED`] role is always
/// present, whether the set was built in code or loaded from a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    /// Whether the set grants `role`, either directly or through [`ADMIN`].
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.is_admin() || self.0.contains(role)
    }

    /// Whether the set contains [`ADMIN`].
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0.contains(ADMIN)
    }

    /// Add a role. Returns `false` if it was already present.
    pub fn grant(&mut self, role: impl Into<String>) -> bool {
        self.0.insert(role.into())
    }

    /// Remove a role. The baseline role cannot be revoked.
    pub fn revoke(&mut self, role: &str) -> bool {
        role != AUTHENTICATED && self.0.remove(role)
    }

    /// Iterate over role names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of roles in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self(BTreeSet::from([AUTHENTICATED.to_owned()]))
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::default();
        set.0.extend(iter.into_iter().map(Into::into));
        set
    }
}

impl From<Vec<String>> for RoleSet {
    fn from(roles: Vec<String>) -> Self {
        roles.into_iter().collect()
    }
}

impl From<RoleSet> for Vec<String> {
    fn from(roles: RoleSet) -> Self {
        roles.0.into_iter().collect()
    }
}
