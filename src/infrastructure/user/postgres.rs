//! PostgreSQL user repository
//!
//! Binds the generic record repository to the `users` table and marshals
//! rows to and from the `User` domain object.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::DomainError;
use crate::domain::user::{NewUser, User, UserChanges, UserFilter, UserRepository};
use crate::infrastructure::db::storage_error;
use crate::infrastructure::sql::{Record, SqlRepository, SqlTable, SqlValue};

/// Raw `users` row shape.
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::from_parts(
            row.id,
            row.email,
            row.first_name,
            row.last_name,
            row.is_active,
            row.password_hash,
            row.created_at,
            row.updated_at,
        )
    }
}

pub struct UsersTable;

impl SqlTable for UsersTable {
    type Row = UserRow;

    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "email",
        "first_name",
        "last_name",
        "is_active",
        "password_hash",
        "created_at",
        "updated_at",
    ];
}

#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    records: SqlRepository<UsersTable>,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            records: SqlRepository::new(pool),
        }
    }

    /// Create the `users` table if it does not exist. The `UNIQUE`
    /// constraint on `email` is the real uniqueness guarantee; the
    /// service-level find-then-create check alone is racy under
    /// concurrent creation.
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(self.records.pool())
        .await
        .map_err(|e| DomainError::database(format!("Failed to create users table: {e}")))?;

        Ok(())
    }
}

fn filter_record(filter: UserFilter) -> Record {
    let mut record = Record::new();
    if let Some(is_active) = filter.is_active {
        record.insert("is_active".to_string(), SqlValue::Bool(is_active));
    }
    record
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut record = Record::new();
        record.insert("email".to_string(), SqlValue::Text(user.email.clone()));
        record.insert("first_name".to_string(), SqlValue::Text(user.first_name));
        record.insert("last_name".to_string(), SqlValue::Text(user.last_name));
        record.insert("is_active".to_string(), SqlValue::Bool(user.is_active));
        record.insert(
            "password_hash".to_string(),
            SqlValue::Text(user.password_hash),
        );

        let row = self.records.create(record).await.map_err(|e| match e {
            // Lost the find-then-create race; the unique index caught it
            DomainError::Business { .. } => {
                DomainError::business(format!("User with email {} already exists", user.email))
            }
            other => other,
        })?;

        Ok(row.into())
    }

    async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        Ok(self.records.find_by_id(id).await?.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(self.records.pool())
            .await
            .map_err(|e| storage_error("Failed to fetch user by email", e))?;

        Ok(row.map(Into::into))
    }

    async fn list(
        &self,
        filter: UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, DomainError> {
        let rows = self
            .records
            .find_all(&filter_record(filter), limit, offset)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: UserFilter) -> Result<i64, DomainError> {
        self.records.count(&filter_record(filter)).await
    }

    async fn update(&self, id: &str, changes: UserChanges) -> Result<User, DomainError> {
        let email = changes.email.clone();

        let mut record = Record::new();
        if let Some(value) = changes.email {
            record.insert("email".to_string(), SqlValue::Text(value));
        }
        if let Some(value) = changes.first_name {
            record.insert("first_name".to_string(), SqlValue::Text(value));
        }
        if let Some(value) = changes.last_name {
            record.insert("last_name".to_string(), SqlValue::Text(value));
        }
        if let Some(value) = changes.is_active {
            record.insert("is_active".to_string(), SqlValue::Bool(value));
        }
        if let Some(value) = changes.password_hash {
            record.insert("password_hash".to_string(), SqlValue::Text(value));
        }

        let row = self.records.update(id, record).await.map_err(|e| match e {
            DomainError::Business { .. } => DomainError::business(format!(
                "User with email {} already exists",
                email.unwrap_or_default()
            )),
            other => other,
        })?;

        Ok(row.into())
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        self.records.delete(id).await
    }
}
