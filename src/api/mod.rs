/// API routes and handlers
pub mod community;
pub mod health;
pub mod objects;
pub mod reports;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(health::routes())
        .merge(reports::routes())
        .merge(objects::routes())
        .merge(community::routes())
}
