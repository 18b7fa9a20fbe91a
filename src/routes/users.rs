use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};

use crate::{
    dto::users::{NearbyAssistantList, NearbyQuery, UpdateUserRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/nearby", get(nearby_assistants))
        .route("/{id}", get(get_user))
        .route("/{id}", put(update_user))
}

#[utoipa::path(
    get,
    path = "/api/users/nearby",
    params(
        ("lat" = f64, Query, description = "Center latitude"),
        ("lng" = f64, Query, description = "Center longitude"),
        ("radius" = Option<f64>, Query, description = "Radius in km, default 10"),
    ),
    responses(
        (status = 200, description = "Assistants within the radius, closest first", body = ApiResponse<NearbyAssistantList>),
        (status = 400, description = "Invalid coordinates"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn nearby_assistants(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<ApiResponse<NearbyAssistantList>>> {
    let resp = user_service::nearby_assistants(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Get user", body = ApiResponse<User>),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::get_user(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = ApiResponse<User>),
        (status = 403, description = "Not the profile owner"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::update_user(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
