use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod bookings;
pub mod categories;
pub mod doc;
pub mod health;
pub mod messages;
pub mod reviews;
pub mod services;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/categories", categories::router())
        .nest("/services", services::router())
        .nest("/bookings", bookings::router())
        .nest("/reviews", reviews::router())
        .nest("/messages", messages::router())
}
