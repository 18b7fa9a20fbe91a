use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    dto::services::{CreateServiceRequest, ServiceList, ServiceListQuery, UpdateServiceRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Service,
    response::ApiResponse,
    services::service_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(list_services))
        .route("/", axum::routing::post(create_service))
        .route("/{id}", axum::routing::get(get_service))
        .route("/{id}", axum::routing::put(update_service))
        .route("/{id}", axum::routing::delete(delete_service))
}

#[utoipa::path(
    get,
    path = "/api/services",
    params(
        ("category_id" = Option<i64>, Query, description = "Filter by category"),
        ("assistant_id" = Option<i64>, Query, description = "Filter by assistant"),
    ),
    responses(
        (status = 200, description = "List services", body = ApiResponse<ServiceList>)
    ),
    tag = "Services"
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ServiceListQuery>,
) -> AppResult<Json<ApiResponse<ServiceList>>> {
    let resp = service_service::list_services(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/services/{id}",
    params(
        ("id" = i64, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Get service", body = ApiResponse<Service>),
        (status = 404, description = "Service not found"),
    ),
    tag = "Services"
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp = service_service::get_service(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Create service", body = ApiResponse<Service>),
        (status = 403, description = "Assistant or admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn create_service(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateServiceRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Service>>)> {
    let resp = service_service::create_service(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/services/{id}",
    params(
        ("id" = i64, Path, description = "Service ID")
    ),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Updated service", body = ApiResponse<Service>),
        (status = 403, description = "Owner or admin only"),
        (status = 404, description = "Service not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn update_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateServiceRequest>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp = service_service::update_service(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    params(
        ("id" = i64, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Deleted service"),
        (status = 403, description = "Owner or admin only"),
        (status = 404, description = "Service not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn delete_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = service_service::delete_service(&state, &user, id).await?;
    Ok(Json(resp))
}
