mod dto;
pub mod handlers;
pub mod repo;
pub mod rules;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::public_routes())
        .merge(handlers::owner_routes())
}
