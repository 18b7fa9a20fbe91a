use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Message;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    /// Defaults to the caller; only admin may send on someone else's behalf.
    pub sender_id: Option<i64>,
    pub receiver_id: i64,
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageList {
    pub items: Vec<Message>,
}
