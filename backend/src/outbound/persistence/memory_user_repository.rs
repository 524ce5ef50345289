//! In-memory `UserRepository` with a unique email index.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NormalizedEmail, User, UserId};

#[derive(Debug, Default)]
struct UserTable {
    rows: HashMap<UserId, User>,
    by_email: HashMap<NormalizedEmail, UserId>,
}

impl UserTable {
    /// Reject `user` when its email is indexed under a different id.
    fn check_unique(&self, user: &User) -> Result<(), UserPersistenceError> {
        match self.by_email.get(&user.email) {
            Some(owner) if owner != &user.id => {
                Err(UserPersistenceError::duplicate_key(user.email.as_ref()))
            }
            _ => Ok(()),
        }
    }
}

/// Shared in-process user store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.table.read().await.rows.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &NormalizedEmail,
    ) -> Result<Option<User>, UserPersistenceError> {
        let table = self.table.read().await;
        Ok(table
            .by_email
            .get(email)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut table = self.table.write().await;
        if table.rows.contains_key(&user.id) {
            return Err(UserPersistenceError::query(format!(
                "user {} already exists",
                user.id
            )));
        }
        table.check_unique(user)?;
        table.by_email.insert(user.email.clone(), user.id.clone());
        table.rows.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut table = self.table.write().await;
        table.check_unique(user)?;
        let previous_email = match table.rows.get_mut(&user.id) {
            Some(row) => std::mem::replace(row, user.clone()).email,
            None => return Err(UserPersistenceError::not_found()),
        };
        if previous_email != user.email {
            table.by_email.remove(&previous_email);
            table.by_email.insert(user.email.clone(), user.id.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<u64, UserPersistenceError> {
        let mut table = self.table.write().await;
        match table.rows.remove(id) {
            Some(user) => {
                table.by_email.remove(&user.email);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
