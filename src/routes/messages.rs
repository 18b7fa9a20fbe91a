use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    dto::messages::{MessageList, SendMessageRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Message,
    response::ApiResponse,
    services::message_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(send_message))
        .route("/conversation/{a}/{b}", axum::routing::get(get_conversation))
        .route("/{id}/read", axum::routing::patch(mark_read))
}

#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Send message", body = ApiResponse<Message>),
        (status = 404, description = "Receiver not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Message>>)> {
    let resp = message_service::send_message(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/messages/conversation/{a}/{b}",
    params(
        ("a" = i64, Path, description = "First participant"),
        ("b" = i64, Path, description = "Second participant"),
    ),
    responses(
        (status = 200, description = "Both directions, oldest first", body = ApiResponse<MessageList>),
        (status = 403, description = "Caller is not a participant"),
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Path((a, b)): Path<(i64, i64)>,
) -> AppResult<Json<ApiResponse<MessageList>>> {
    let resp = message_service::get_conversation(&state, &user, a, b).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/messages/{id}/read",
    params(
        ("id" = i64, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "Marked read", body = ApiResponse<Message>),
        (status = 403, description = "Caller is not the receiver"),
        (status = 404, description = "Message not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Message>>> {
    let resp = message_service::mark_message_read(&state, &user, id).await?;
    Ok(Json(resp))
}
