pub mod auth_service;
pub mod booking_service;
pub mod category_service;
pub mod message_service;
pub mod review_service;
pub mod service_service;
pub mod user_service;
