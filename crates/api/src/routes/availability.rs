use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/tutors/:id/availability",
            put(handlers::availability::put_availability),
        )
        .route(
            "/api/tutors/:id/availability",
            get(handlers::availability::get_availability),
        )
}
