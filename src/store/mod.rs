use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    Booking, BookingLocation, BookingStatus, GeoPoint, Message, Review, Role, Service,
    ServiceCategory, User,
};

pub mod memory;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub languages: Option<Vec<String>>,
    pub bio: Option<String>,
    pub location: Option<GeoPoint>,
}

/// Partial update. Supplied fields overwrite, omitted fields are retained.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub full_name: Option<String>,
    pub languages: Option<Vec<String>>,
    pub bio: Option<String>,
    pub is_verified: Option<bool>,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub icon: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewService {
    pub assistant_id: i64,
    pub category_id: i64,
    pub hourly_rate: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ServicePatch {
    pub category_id: Option<i64>,
    pub hourly_rate: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub client_id: i64,
    pub assistant_id: i64,
    pub service_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: BookingLocation,
    pub total_amount: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub booking_id: i64,
    pub client_id: i64,
    pub assistant_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
}

/// The query/command seam between the service layer and persistence.
///
/// Callers validate referential integrity before mutating; the store assigns
/// ids (monotonic per entity kind, never reused) and stamps timestamps. An
/// alternate backend (e.g. a relational database) substitutes here without
/// touching the service layer.
#[async_trait]
pub trait Store: Send + Sync {
    // users
    async fn create_user(&self, new: NewUser) -> StoreResult<User>;
    async fn get_user(&self, id: i64) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    /// Case-insensitive lookup.
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    /// Case-insensitive lookup.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Merge-updates the user and refreshes `last_active`, even when no field
    /// in the patch is set. Returns `None` when the id does not resolve.
    async fn update_user(&self, id: i64, patch: UserPatch) -> StoreResult<Option<User>>;
    /// Assistants with a known location within `radius_km` of `center`,
    /// paired with their distance and sorted ascending by it.
    async fn nearby_assistants(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> StoreResult<Vec<(User, f64)>>;

    // service categories
    async fn create_category(&self, new: NewCategory) -> StoreResult<ServiceCategory>;
    async fn get_category(&self, id: i64) -> StoreResult<Option<ServiceCategory>>;
    async fn list_categories(&self) -> StoreResult<Vec<ServiceCategory>>;
    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<ServiceCategory>>;
    async fn update_category(
        &self,
        id: i64,
        patch: CategoryPatch,
    ) -> StoreResult<Option<ServiceCategory>>;
    async fn delete_category(&self, id: i64) -> StoreResult<bool>;

    // services
    async fn create_service(&self, new: NewService) -> StoreResult<Service>;
    async fn get_service(&self, id: i64) -> StoreResult<Option<Service>>;
    async fn list_services(&self) -> StoreResult<Vec<Service>>;
    async fn list_services_by_assistant(&self, assistant_id: i64) -> StoreResult<Vec<Service>>;
    async fn list_services_by_category(&self, category_id: i64) -> StoreResult<Vec<Service>>;
    async fn update_service(&self, id: i64, patch: ServicePatch) -> StoreResult<Option<Service>>;
    async fn delete_service(&self, id: i64) -> StoreResult<bool>;

    // bookings
    async fn create_booking(&self, new: NewBooking) -> StoreResult<Booking>;
    async fn get_booking(&self, id: i64) -> StoreResult<Option<Booking>>;
    async fn list_bookings(&self) -> StoreResult<Vec<Booking>>;
    /// Bookings where the user is a party on either side.
    async fn list_bookings_for_user(&self, user_id: i64) -> StoreResult<Vec<Booking>>;
    async fn update_booking(&self, id: i64, patch: BookingPatch) -> StoreResult<Option<Booking>>;

    // reviews
    /// Compound operation: inserts the review, then recomputes the assistant's
    /// `avg_rating` as the mean over all their reviews.
    async fn create_review(&self, new: NewReview) -> StoreResult<Review>;
    async fn list_reviews_by_assistant(&self, assistant_id: i64) -> StoreResult<Vec<Review>>;

    // messages
    async fn create_message(&self, new: NewMessage) -> StoreResult<Message>;
    async fn get_message(&self, id: i64) -> StoreResult<Option<Message>>;
    /// Both directions of the conversation between `a` and `b`, ordered
    /// ascending by creation time.
    async fn get_conversation(&self, a: i64, b: i64) -> StoreResult<Vec<Message>>;
    async fn mark_message_read(&self, id: i64) -> StoreResult<Option<Message>>;
}
