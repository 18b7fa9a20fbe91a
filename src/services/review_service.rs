use crate::{
    dto::reviews::{CreateReviewRequest, ReviewList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{BookingStatus, Review, Role},
    response::{ApiResponse, Meta},
    state::AppState,
    store::NewReview,
};

pub async fn list_reviews_by_assistant(
    state: &AppState,
    assistant_id: i64,
) -> AppResult<ApiResponse<ReviewList>> {
    if state.store.get_user(assistant_id).await?.is_none() {
        return Err(AppError::NotFound);
    }
    let items = state.store.list_reviews_by_assistant(assistant_id).await?;
    let meta = Meta::with_total(items.len() as i64);
    Ok(ApiResponse::success(
        "Reviews",
        ReviewList { items },
        Some(meta),
    ))
}

pub async fn create_review(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    let client_id = payload.client_id.unwrap_or(user.user_id);
    if user.role != Role::Admin && client_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    let booking = state
        .store
        .get_booking(payload.booking_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if booking.status != BookingStatus::Completed {
        return Err(AppError::BadRequest(
            "Booking is not completed".to_string(),
        ));
    }
    if booking.client_id != client_id || booking.assistant_id != payload.assistant_id {
        return Err(AppError::BadRequest(
            "Review does not match booking parties".to_string(),
        ));
    }

    let review = state
        .store
        .create_review(NewReview {
            booking_id: payload.booking_id,
            client_id,
            assistant_id: payload.assistant_id,
            rating: payload.rating,
            comment: payload.comment,
        })
        .await?;

    tracing::info!(
        review_id = review.id,
        assistant_id = review.assistant_id,
        rating = review.rating,
        "review created"
    );
    Ok(ApiResponse::success(
        "Review created",
        review,
        Some(Meta::empty()),
    ))
}
