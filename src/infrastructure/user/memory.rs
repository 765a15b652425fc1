//! In-memory user repository
//!
//! Mirrors the semantics of the PostgreSQL repository, including id and
//! timestamp assignment and the storage-level email uniqueness guarantee.
//! Used for tests and local development without a database; swapping it in
//! is a constructor argument, not a container registration.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::user::{NewUser, User, UserChanges, UserFilter, UserRepository};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(user: &User, filter: UserFilter) -> bool {
    match filter.is_active {
        Some(is_active) => user.is_active() == is_active,
        None => true,
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email() == user.email) {
            return Err(DomainError::business(format!(
                "User with email {} already exists",
                user.email
            )));
        }

        let now = Utc::now();
        let stored = User::from_parts(
            Uuid::new_v4().to_string(),
            user.email,
            user.first_name,
            user.last_name,
            user.is_active,
            user.password_hash,
            now,
            now,
        );
        users.insert(stored.id().to_string(), stored.clone());

        Ok(stored)
    }

    async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email() == email).cloned())
    }

    async fn list(
        &self,
        filter: UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users
            .values()
            .filter(|u| matches(u, filter))
            .cloned()
            .collect();
        result.sort_by_key(|u| u.created_at());

        Ok(result
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, filter: UserFilter) -> Result<i64, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| matches(u, filter)).count() as i64)
    }

    async fn update(&self, id: &str, changes: UserChanges) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if let Some(email) = &changes.email {
            let taken = users
                .values()
                .any(|u| u.email() == email.as_str() && u.id() != id);
            if taken {
                return Err(DomainError::business(format!(
                    "User with email {email} already exists"
                )));
            }
        }

        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("User with id {id} not found")))?;
        user.apply(&changes);

        Ok(user.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;

        if users.remove(id).is_none() {
            return Err(DomainError::not_found(format!(
                "User with id {id} not found"
            )));
        }

        Ok(true)
    }
}
