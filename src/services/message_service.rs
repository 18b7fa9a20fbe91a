use crate::{
    dto::messages::{MessageList, SendMessageRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Message, Role},
    response::{ApiResponse, Meta},
    state::AppState,
    store::NewMessage,
};

pub async fn send_message(
    state: &AppState,
    user: &AuthUser,
    payload: SendMessageRequest,
) -> AppResult<ApiResponse<Message>> {
    let sender_id = payload.sender_id.unwrap_or(user.user_id);
    if user.role != Role::Admin && sender_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    if payload.content.trim().is_empty() {
        return Err(AppError::BadRequest("Message content is required".to_string()));
    }
    if state.store.get_user(payload.receiver_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let message = state
        .store
        .create_message(NewMessage {
            sender_id,
            receiver_id: payload.receiver_id,
            content: payload.content,
        })
        .await?;

    tracing::info!(
        message_id = message.id,
        sender_id,
        receiver_id = message.receiver_id,
        "message sent"
    );
    Ok(ApiResponse::success(
        "Message sent",
        message,
        Some(Meta::empty()),
    ))
}

pub async fn get_conversation(
    state: &AppState,
    user: &AuthUser,
    a: i64,
    b: i64,
) -> AppResult<ApiResponse<MessageList>> {
    if user.role != Role::Admin && user.user_id != a && user.user_id != b {
        return Err(AppError::Forbidden);
    }
    let items = state.store.get_conversation(a, b).await?;
    let meta = Meta::with_total(items.len() as i64);
    Ok(ApiResponse::success(
        "Conversation",
        MessageList { items },
        Some(meta),
    ))
}

pub async fn mark_message_read(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<Message>> {
    let message = state
        .store
        .get_message(id)
        .await?
        .ok_or(AppError::NotFound)?;
    if user.role != Role::Admin && user.user_id != message.receiver_id {
        return Err(AppError::Forbidden);
    }

    let message = state
        .store
        .mark_message_read(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Read", message, Some(Meta::empty())))
}
