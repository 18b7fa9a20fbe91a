use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    dto::reviews::{CreateReviewRequest, ReviewList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Review,
    response::ApiResponse,
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_review))
        .route("/assistant/{id}", axum::routing::get(list_reviews))
}

#[utoipa::path(
    get,
    path = "/api/reviews/assistant/{id}",
    params(
        ("id" = i64, Path, description = "Assistant ID")
    ),
    responses(
        (status = 200, description = "Reviews for the assistant", body = ApiResponse<ReviewList>),
        (status = 404, description = "Assistant not found"),
    ),
    tag = "Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_reviews_by_assistant(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Create review", body = ApiResponse<Review>),
        (status = 400, description = "Rating out of range or booking not completed"),
        (status = 404, description = "Booking not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Review>>)> {
    let resp = review_service::create_review(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
