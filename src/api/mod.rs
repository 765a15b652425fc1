//! API layer - request/response adaptation
//!
//! Handlers, DTOs, the error envelope, and the router. This layer owns the
//! translation between HTTP and the domain: typed request parsing, lenient
//! pagination, and the single conversion point from `DomainError` to the
//! `{error, message, status_code}` envelope.

pub mod health;
pub mod router;
pub mod state;
pub mod types;
pub mod users;

pub use router::create_router;
pub use state::AppState;
