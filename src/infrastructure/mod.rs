//! Infrastructure layer - storage, logging, and service implementations

pub mod db;
pub mod logging;
pub mod sql;
pub mod user;

pub use db::{Database, HealthProbe};
