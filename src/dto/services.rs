use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Service;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateServiceRequest {
    /// Defaults to the caller; only admin may attribute someone else.
    pub assistant_id: Option<i64>,
    pub category_id: i64,
    pub hourly_rate: f64,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateServiceRequest {
    pub category_id: Option<i64>,
    pub hourly_rate: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ServiceListQuery {
    pub category_id: Option<i64>,
    pub assistant_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceList {
    pub items: Vec<Service>,
}
