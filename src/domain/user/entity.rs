//! User entity and the value objects exchanged with the repository

use chrono::{DateTime, Utc};

/// User record as it exists in storage.
///
/// The password hash is carried for persistence and verification but is
/// never part of an API response; response DTOs are built from the public
/// accessors and simply have no password field.
#[derive(Debug, Clone)]
pub struct User {
    id: String,
    email: String,
    first_name: String,
    last_name: String,
    is_active: bool,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Reconstruct a user from stored parts. The repository is the only
    /// intended caller; ids and timestamps are assigned at creation time
    /// by the storage layer, not here.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        is_active: bool,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            is_active,
            password_hash: password_hash.into(),
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// `"{first_name} {last_name}"`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    // Mutators

    /// Apply a partial update. Only supplied fields change; the update
    /// timestamp is refreshed when at least one field is supplied.
    pub fn apply(&mut self, changes: &UserChanges) {
        if changes.is_empty() {
            return;
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        if let Some(first_name) = &changes.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &changes.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        if let Some(password_hash) = &changes.password_hash {
            self.password_hash = password_hash.clone();
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Input for creating a user. The password has already been hashed by the
/// service layer; the repository never sees a plaintext password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub password_hash: String,
}

/// Partial update for a user. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.is_active.is_none()
            && self.password_hash.is_none()
    }
}
