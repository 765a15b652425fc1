//! Generic record repository
//!
//! Table-parameterized CRUD over `column name -> value` records, built on
//! dynamically assembled, fully parameterized SQL. Values always travel as
//! bind parameters; the only identifiers interpolated into SQL text are the
//! table and column names of the compile-time [`SqlTable`] descriptor, and
//! record/filter keys are checked against that fixed set before any query
//! is built.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow, Postgres};
use sqlx::query_builder::Separated;
use sqlx::QueryBuilder;
use uuid::Uuid;

use super::db::storage_error;
use crate::domain::DomainError;

/// A dynamically typed SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Column name -> value mapping used for inserts, partial updates and
/// equality filters. A `BTreeMap` keeps column order deterministic.
pub type Record = BTreeMap<String, SqlValue>;

/// Compile-time description of a table: its name, its full column set, and
/// the row type its queries decode into.
pub trait SqlTable: Send + Sync {
    type Row: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>;

    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
}

/// Table-agnostic CRUD repository bound to a [`SqlTable`].
///
/// Ids (UUIDv4 strings) and creation/update timestamps are assigned here:
/// the repository is the sole writer of persisted state.
pub struct SqlRepository<T: SqlTable> {
    pool: PgPool,
    _table: PhantomData<T>,
}

impl<T: SqlTable> std::fmt::Debug for SqlRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlRepository")
            .field("table", &T::TABLE)
            .finish()
    }
}

impl<T: SqlTable> Clone for SqlRepository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _table: PhantomData,
        }
    }
}

impl<T: SqlTable> SqlRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _table: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a record, assigning a fresh id and matching
    /// created/updated timestamps. Returns the stored row.
    pub async fn create(&self, data: Record) -> Result<T::Row, DomainError> {
        let mut record = data;
        let now = Utc::now();
        record.insert("id".to_string(), SqlValue::Text(Uuid::new_v4().to_string()));
        record.insert("created_at".to_string(), SqlValue::Timestamp(now));
        record.insert("updated_at".to_string(), SqlValue::Timestamp(now));
        validate_columns::<T>(&record)?;

        let mut query = insert_query(T::TABLE, &record);
        query
            .build_query_as::<T::Row>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to create record", e))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<T::Row>, DomainError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", T::TABLE);
        sqlx::query_as::<_, T::Row>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to fetch record", e))
    }

    pub async fn find_by_id_or_error(&self, id: &str) -> Result<T::Row, DomainError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Record with id {id} not found")))
    }

    /// Fetch rows matching the equality-conjunction filter, in creation
    /// order, with `LIMIT`/`OFFSET` pagination.
    pub async fn find_all(
        &self,
        filters: &Record,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<T::Row>, DomainError> {
        validate_columns::<T>(filters)?;

        let mut query = select_query(T::TABLE, filters, limit, offset);
        query
            .build_query_as::<T::Row>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to fetch records", e))
    }

    /// Apply a partial update, refreshing `updated_at`. Fails with
    /// `NotFound` if the row is absent; an empty change set returns the
    /// row unmodified.
    pub async fn update(&self, id: &str, data: Record) -> Result<T::Row, DomainError> {
        let current = self.find_by_id_or_error(id).await?;
        if data.is_empty() {
            return Ok(current);
        }

        let mut record = data;
        record.insert("updated_at".to_string(), SqlValue::Timestamp(Utc::now()));
        validate_columns::<T>(&record)?;

        let mut query = update_query(T::TABLE, id, &record);
        query
            .build_query_as::<T::Row>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to update record", e))
    }

    /// Hard delete. Fails with `NotFound` if the row is absent.
    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        self.find_by_id_or_error(id).await?;

        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete record", e))?;

        Ok(true)
    }

    /// Count rows matching the filter, same filter semantics as
    /// [`find_all`](Self::find_all).
    pub async fn count(&self, filters: &Record) -> Result<i64, DomainError> {
        validate_columns::<T>(filters)?;

        let mut query = count_query(T::TABLE, filters);
        query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to count records", e))
    }
}

/// Record and filter keys must come from the table's fixed column set;
/// they are interpolated into SQL text and must never be caller-supplied.
fn validate_columns<T: SqlTable>(record: &Record) -> Result<(), DomainError> {
    for column in record.keys() {
        if !T::COLUMNS.contains(&column.as_str()) {
            return Err(DomainError::repository(format!(
                "Unknown column `{column}` for table `{}`",
                T::TABLE
            )));
        }
    }
    Ok(())
}

fn push_bind_separated(separated: &mut Separated<'_, 'static, Postgres, &str>, value: &SqlValue) {
    match value {
        SqlValue::Text(v) => separated.push_bind(v.clone()),
        SqlValue::Bool(v) => separated.push_bind(*v),
        SqlValue::Timestamp(v) => separated.push_bind(*v),
    };
}

fn push_bind_unseparated(separated: &mut Separated<'_, 'static, Postgres, &str>, value: &SqlValue) {
    match value {
        SqlValue::Text(v) => separated.push_bind_unseparated(v.clone()),
        SqlValue::Bool(v) => separated.push_bind_unseparated(*v),
        SqlValue::Timestamp(v) => separated.push_bind_unseparated(*v),
    };
}

fn push_filters(query: &mut QueryBuilder<'static, Postgres>, filters: &Record) {
    if filters.is_empty() {
        return;
    }
    query.push(" WHERE ");
    let mut separated = query.separated(" AND ");
    for (column, value) in filters {
        separated.push(format!("{column} = "));
        push_bind_unseparated(&mut separated, value);
    }
}

fn insert_query(table: &str, record: &Record) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("INSERT INTO {table} ("));
    {
        let mut separated = query.separated(", ");
        for column in record.keys() {
            separated.push(column.as_str());
        }
    }
    query.push(") VALUES (");
    {
        let mut separated = query.separated(", ");
        for value in record.values() {
            push_bind_separated(&mut separated, value);
        }
    }
    query.push(") RETURNING *");
    query
}

fn select_query(
    table: &str,
    filters: &Record,
    limit: i64,
    offset: i64,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT * FROM {table}"));
    push_filters(&mut query, filters);
    query.push(" ORDER BY created_at");
    query.push(" LIMIT ");
    query.push_bind(limit);
    query.push(" OFFSET ");
    query.push_bind(offset);
    query
}

fn update_query(table: &str, id: &str, record: &Record) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("UPDATE {table} SET "));
    {
        let mut separated = query.separated(", ");
        for (column, value) in record {
            separated.push(format!("{column} = "));
            push_bind_unseparated(&mut separated, value);
        }
    }
    query.push(" WHERE id = ");
    query.push_bind(id.to_string());
    query.push(" RETURNING *");
    query
}

fn count_query(table: &str, filters: &Record) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT COUNT(*) FROM {table}"));
    push_filters(&mut query, filters);
    query
}
