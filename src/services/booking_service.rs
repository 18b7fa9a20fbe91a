use crate::{
    dto::bookings::{BookingList, CreateBookingRequest, UpdateBookingRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Booking, Role},
    policy::authorize_transition,
    response::{ApiResponse, Meta},
    state::AppState,
    store::{BookingPatch, NewBooking},
};

pub async fn list_bookings(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<BookingList>> {
    let items = if user.role == Role::Admin {
        state.store.list_bookings().await?
    } else {
        state.store.list_bookings_for_user(user.user_id).await?
    };
    let meta = Meta::with_total(items.len() as i64);
    Ok(ApiResponse::success(
        "Bookings",
        BookingList { items },
        Some(meta),
    ))
}

pub async fn get_booking(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<Booking>> {
    let booking = state
        .store
        .get_booking(id)
        .await?
        .ok_or(AppError::NotFound)?;
    if user.role != Role::Admin
        && user.user_id != booking.client_id
        && user.user_id != booking.assistant_id
    {
        return Err(AppError::Forbidden);
    }
    Ok(ApiResponse::success("Booking", booking, None))
}

pub async fn create_booking(
    state: &AppState,
    user: &AuthUser,
    payload: CreateBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    let client_id = payload.client_id.unwrap_or(user.user_id);
    if user.role != Role::Admin && client_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    if payload.end_time <= payload.start_time {
        return Err(AppError::BadRequest(
            "End time must be after start time".to_string(),
        ));
    }

    let service = state
        .store
        .get_service(payload.service_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let assistant = state
        .store
        .get_user(payload.assistant_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if assistant.role != Role::Assistant {
        return Err(AppError::BadRequest(
            "User is not an assistant".to_string(),
        ));
    }

    let hours = (payload.end_time - payload.start_time).num_seconds() as f64 / 3600.0;
    let total_amount = service.hourly_rate * hours;

    let booking = state
        .store
        .create_booking(NewBooking {
            client_id,
            assistant_id: payload.assistant_id,
            service_id: payload.service_id,
            start_time: payload.start_time,
            end_time: payload.end_time,
            location: payload.location,
            total_amount,
            notes: payload.notes,
        })
        .await?;

    tracing::info!(
        booking_id = booking.id,
        client_id,
        assistant_id = booking.assistant_id,
        "booking created"
    );
    Ok(ApiResponse::success(
        "Booking created",
        booking,
        Some(Meta::empty()),
    ))
}

pub async fn update_booking(
    state: &AppState,
    user: &AuthUser,
    id: i64,
    payload: UpdateBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    let existing = state
        .store
        .get_booking(id)
        .await?
        .ok_or(AppError::NotFound)?;

    if user.role != Role::Admin
        && user.user_id != existing.client_id
        && user.user_id != existing.assistant_id
    {
        return Err(AppError::Forbidden);
    }

    if let Some(status) = payload.status {
        authorize_transition(user, &existing, status)?;
    }

    let patch = BookingPatch {
        status: payload.status,
        notes: payload.notes,
    };
    let booking = state
        .store
        .update_booking(id, patch)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(status) = payload.status {
        tracing::info!(booking_id = id, status = ?status, "booking status changed");
    }
    Ok(ApiResponse::success("Updated", booking, Some(Meta::empty())))
}
