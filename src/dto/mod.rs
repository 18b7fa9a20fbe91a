pub mod auth;
pub mod bookings;
pub mod messages;
pub mod reviews;
pub mod services;
pub mod users;
