//! API module
//!
//! HTTP surface: shared state, middleware, and routes.

pub mod middleware;
pub mod routes;

pub use routes::build_router;

use sqlx::PgPool;

use crate::security::TokenService;

/// Shared application state.
///
/// The token service is immutable after startup; the pool handles its own
/// synchronization. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: TokenService,
}
