use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{GeoPoint, Role, User};

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// Defaults to client. Admin accounts cannot be self-registered.
    pub role: Option<Role>,
    pub languages: Option<Vec<String>>,
    pub bio: Option<String>,
    pub location: Option<GeoPoint>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}
