//! User repository trait

use async_trait::async_trait;

use super::entity::{NewUser, User, UserChanges};
use crate::domain::DomainError;

/// Equality filter applied to list/count operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub is_active: Option<bool>,
}

/// Repository trait for user storage.
///
/// The repository is the sole writer of persisted state: it assigns ids and
/// creation/update timestamps. Business rules live one layer up, in the
/// service.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, assigning id and timestamps. Returns the stored row.
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Get a user by id.
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError>;

    /// Get a user by id, or fail with `NotFound`.
    async fn get_or_error(&self, id: &str) -> Result<User, DomainError> {
        self.get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User with id {id} not found")))
    }

    /// Equality lookup by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// List users in creation order, applying the filter and pagination.
    async fn list(
        &self,
        filter: UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, DomainError>;

    /// Count users matching the filter.
    async fn count(&self, filter: UserFilter) -> Result<i64, DomainError>;

    /// Apply a partial update. Fails with `NotFound` if the user is absent;
    /// an empty change set returns the row unmodified.
    async fn update(&self, id: &str, changes: UserChanges) -> Result<User, DomainError>;

    /// Hard delete. Fails with `NotFound` if the user is absent.
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;
}
