//! User service
//!
//! Business rules over the repository: required fields, email uniqueness,
//! password hashing. The repository and hasher are constructor arguments,
//! so tests substitute in-memory implementations directly.

use std::sync::Arc;

use tracing::debug;

use super::password::PasswordHasher;
use crate::domain::DomainError;
use crate::domain::user::{NewUser, User, UserChanges, UserFilter, UserRepository};

/// Request for creating a new user (plaintext password; hashed here and
/// never stored or returned).
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub is_active: bool,
}

/// Partial update request. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Create a user. Requires email, first name, last name and password to
    /// be non-empty, and the email to be unregistered.
    ///
    /// The uniqueness check and the insert are two separate statements, so
    /// concurrent creates of the same email can race past the check; the
    /// `UNIQUE` constraint on `users.email` is the actual guarantee, and a
    /// violation surfaces as the same business error.
    pub async fn create_user(&self, request: CreateUser) -> Result<User, DomainError> {
        for (field, value) in [
            ("email", &request.email),
            ("first_name", &request.first_name),
            ("last_name", &request.last_name),
            ("password", &request.password),
        ] {
            if value.is_empty() {
                return Err(DomainError::business(format!(
                    "Missing required field: {field}"
                )));
            }
        }

        if self.repository.find_by_email(&request.email).await?.is_some() {
            return Err(DomainError::business(format!(
                "User with email {} already exists",
                request.email
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user = self
            .repository
            .create(NewUser {
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                is_active: request.is_active,
                password_hash,
            })
            .await?;

        debug!(user_id = %user.id(), "user created");
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<User, DomainError> {
        self.repository.get_or_error(id).await
    }

    /// List users in creation order, optionally filtered on `is_active`.
    pub async fn list_users(
        &self,
        limit: i64,
        offset: i64,
        is_active: Option<bool>,
    ) -> Result<Vec<User>, DomainError> {
        self.repository
            .list(UserFilter { is_active }, limit, offset)
            .await
    }

    pub async fn count_users(&self, is_active: Option<bool>) -> Result<i64, DomainError> {
        self.repository.count(UserFilter { is_active }).await
    }

    /// Apply a partial update. A supplied password is re-hashed and stored
    /// as `password_hash`; a changed email is re-checked for uniqueness.
    pub async fn update_user(&self, id: &str, request: UpdateUser) -> Result<User, DomainError> {
        let existing = self.repository.get_or_error(id).await?;

        let mut changes = UserChanges {
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            is_active: request.is_active,
            password_hash: None,
        };

        if let Some(password) = &request.password {
            changes.password_hash = Some(self.hasher.hash(password)?);
        }

        if let Some(email) = &changes.email {
            if email != existing.email() && self.repository.find_by_email(email).await?.is_some() {
                return Err(DomainError::business(format!(
                    "User with email {email} already exists"
                )));
            }
        }

        self.repository.update(id, changes).await
    }

    /// Hard delete. Fails with `NotFound` if the user is absent.
    pub async fn delete_user(&self, id: &str) -> Result<bool, DomainError> {
        let deleted = self.repository.delete(id).await?;
        debug!(user_id = %id, "user deleted");
        Ok(deleted)
    }
}
