use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{GeoPoint, User};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub languages: Option<Vec<String>>,
    pub bio: Option<String>,
    /// Admin only.
    pub is_verified: Option<bool>,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    /// Kilometers, defaults to 10.
    pub radius: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyAssistant {
    #[serde(flatten)]
    pub user: User,
    pub distance_km: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyAssistantList {
    pub items: Vec<NearbyAssistant>,
}
