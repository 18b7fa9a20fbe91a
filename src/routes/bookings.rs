use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    dto::bookings::{BookingList, CreateBookingRequest, UpdateBookingRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Booking,
    response::ApiResponse,
    services::booking_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(list_bookings))
        .route("/", axum::routing::post(create_booking))
        .route("/{id}", axum::routing::get(get_booking))
        .route("/{id}", axum::routing::put(update_booking))
}

#[utoipa::path(
    get,
    path = "/api/bookings",
    responses(
        (status = 200, description = "Bookings the caller is a party to (all for admin)", body = ApiResponse<BookingList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<BookingList>>> {
    let resp = booking_service::list_bookings(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    params(
        ("id" = i64, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Get booking", body = ApiResponse<Booking>),
        (status = 403, description = "Not a party to the booking"),
        (status = 404, description = "Booking not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let resp = booking_service::get_booking(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Create booking", body = ApiResponse<Booking>),
        (status = 400, description = "Invalid times or assistant"),
        (status = 404, description = "Service or assistant not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Booking>>)> {
    let resp = booking_service::create_booking(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/bookings/{id}",
    params(
        ("id" = i64, Path, description = "Booking ID")
    ),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Updated booking", body = ApiResponse<Booking>),
        (status = 403, description = "Transition not allowed for the caller"),
        (status = 404, description = "Booking not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn update_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBookingRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let resp = booking_service::update_booking(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
