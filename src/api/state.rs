//! Application state for shared services
//!
//! Built once in the composition root and cloned into handlers; there is no
//! service locator. The health probe is a trait object so tests can run the
//! health endpoint without a database.

use std::sync::Arc;

use crate::infrastructure::HealthProbe;
use crate::infrastructure::user::UserService;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub database: Arc<dyn HealthProbe>,
}
