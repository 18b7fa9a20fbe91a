use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Booking, BookingLocation, BookingStatus};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    /// Defaults to the caller; only admin may book on someone else's behalf.
    pub client_id: Option<i64>,
    pub assistant_id: i64,
    pub service_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: BookingLocation,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookingRequest {
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingList {
    pub items: Vec<Booking>,
}
