//! User infrastructure
//!
//! Storage implementations of the user repository (PostgreSQL over the
//! generic record repository, and an in-memory analog for tests), password
//! hashing, and the user service.

pub mod memory;
pub mod password;
pub mod postgres;
pub mod service;

pub use memory::InMemoryUserRepository;
pub use password::{Argon2Hasher, PasswordHasher, SaltedSha256Hasher, hasher_from_config};
pub use postgres::PostgresUserRepository;
pub use service::{CreateUser, UpdateUser, UserService};
