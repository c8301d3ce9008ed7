//! In-process store for tests and tooling.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    PotentialCustomerRepository, RepositoryError, UnregisteredUserRepository, UserRepository,
    WaitingUserRepository,
};
use crate::types::{Email, PotentialCustomerId, UnregisteredUserId, UserId, WaitingUserId};
use crate::user::{PotentialCustomer, UnregisteredUser, User, WaitingUser};

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    unregistered: Vec<UnregisteredUser>,
    waiting: Vec<WaitingUser>,
    potential: Vec<PotentialCustomer>,
    last_id: u32,
}

impl Tables {
    /// IDs are unique across record kinds and never reused.
    fn allocate_id(&mut self) -> Result<u32, RepositoryError> {
        self.last_id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::Storage("id space exhausted".to_owned()))?;
        Ok(self.last_id)
    }

    fn email_taken(&self, email: &Email, exclude: Option<UserId>) -> bool {
        self.users
            .iter()
            .any(|(id, user)| Some(*id) != exclude && user.email == *email)
    }
}

/// A thread-safe store holding every record in memory.
///
/// Email uniqueness is checked and the write applied under one write lock,
/// which makes this store's `Conflict` the authoritative uniqueness check.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, RepositoryError> {
        self.tables
            .read()
            .map_err(|_| RepositoryError::Storage("store lock poisoned".to_owned()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, RepositoryError> {
        self.tables
            .write()
            .map_err(|_| RepositoryError::Storage("store lock poisoned".to_owned()))
    }
}

impl UserRepository for InMemoryStore {
    fn count_by_email_excluding(
        &self,
        email: &Email,
        exclude: Option<UserId>,
    ) -> Result<usize, RepositoryError> {
        Ok(self
            .read()?
            .users
            .iter()
            .filter(|(id, user)| Some(**id) != exclude && user.email == *email)
            .count())
    }

    fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.email == *email)
            .cloned())
    }

    fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.password_reset().token() == Some(token))
            .cloned())
    }

    fn insert(&self, mut user: User) -> Result<User, RepositoryError> {
        let mut tables = self.write()?;
        if tables.email_taken(&user.email, None) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let id = UserId::new(tables.allocate_id()?);
        user.id = Some(id);
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let id = user.id.ok_or(RepositoryError::NotFound)?;
        let mut tables = self.write()?;
        if !tables.users.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if tables.email_taken(&user.email, Some(id)) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        tables.users.insert(id, user.clone());
        Ok(())
    }

    fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        Ok(self.write()?.users.remove(&id).is_some())
    }
}

impl UnregisteredUserRepository for InMemoryStore {
    fn insert_unregistered(
        &self,
        mut record: UnregisteredUser,
    ) -> Result<UnregisteredUser, RepositoryError> {
        let mut tables = self.write()?;
        record.id = Some(UnregisteredUserId::new(tables.allocate_id()?));
        tables.unregistered.push(record.clone());
        Ok(record)
    }

    fn list_unregistered_by_email(
        &self,
        email: &Email,
    ) -> Result<Vec<UnregisteredUser>, RepositoryError> {
        Ok(self
            .read()?
            .unregistered
            .iter()
            .filter(|record| record.email == *email)
            .cloned()
            .collect())
    }
}

impl WaitingUserRepository for InMemoryStore {
    fn count_waiting_by_email(&self, email: &Email) -> Result<usize, RepositoryError> {
        Ok(self
            .read()?
            .waiting
            .iter()
            .filter(|entry| entry.email == *email)
            .count())
    }

    fn insert_waiting(&self, mut entry: WaitingUser) -> Result<WaitingUser, RepositoryError> {
        let mut tables = self.write()?;
        if tables.waiting.iter().any(|w| w.email == entry.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        entry.id = Some(WaitingUserId::new(tables.allocate_id()?));
        tables.waiting.push(entry.clone());
        Ok(entry)
    }
}

impl PotentialCustomerRepository for InMemoryStore {
    fn count_potential_customers_by_email(&self, email: &Email) -> Result<usize, RepositoryError> {
        Ok(self
            .read()?
            .potential
            .iter()
            .filter(|customer| customer.email == *email)
            .count())
    }

    fn get_potential_customer(
        &self,
        id: PotentialCustomerId,
    ) -> Result<Option<PotentialCustomer>, RepositoryError> {
        Ok(self
            .read()?
            .potential
            .iter()
            .find(|customer| customer.id == Some(id))
            .cloned())
    }

    fn insert_potential_customer(
        &self,
        mut customer: PotentialCustomer,
    ) -> Result<PotentialCustomer, RepositoryError> {
        let mut tables = self.write()?;
        if tables.potential.iter().any(|c| c.email == customer.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        customer.id = Some(PotentialCustomerId::new(tables.allocate_id()?));
        tables.potential.push(customer.clone());
        Ok(customer)
    }
}
