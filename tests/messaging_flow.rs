use std::sync::Arc;

use assistant_marketplace_api::{
    dto::{auth::RegisterRequest, messages::SendMessageRequest, users::NearbyQuery},
    error::AppError,
    middleware::auth::AuthUser,
    models::{GeoPoint, Role, User},
    services::{auth_service, message_service, user_service},
    state::AppState,
    store::MemoryStore,
};

fn setup_state() -> AppState {
    AppState::new(Arc::new(MemoryStore::new()))
}

async fn register(
    state: &AppState,
    username: &str,
    role: Role,
    location: Option<GeoPoint>,
) -> anyhow::Result<User> {
    let resp = auth_service::register_user(
        state,
        RegisterRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "correct horse battery".to_string(),
            full_name: username.to_string(),
            role: Some(role),
            languages: None,
            bio: None,
            location,
        },
    )
    .await?;
    Ok(resp.data.unwrap())
}

fn principal(user: &User) -> AuthUser {
    AuthUser {
        user_id: user.id,
        role: user.role,
    }
}

#[tokio::test]
async fn conversation_stays_between_participants() -> anyhow::Result<()> {
    let state = setup_state();
    let alice = register(&state, "alice", Role::Client, None).await?;
    let bob = register(&state, "bob", Role::Assistant, None).await?;
    let mallory = register(&state, "mallory", Role::Client, None).await?;

    let sent = message_service::send_message(
        &state,
        &principal(&alice),
        SendMessageRequest {
            sender_id: None,
            receiver_id: bob.id,
            content: "Are you free Tuesday?".to_string(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!sent.is_read);

    message_service::send_message(
        &state,
        &principal(&bob),
        SendMessageRequest {
            sender_id: None,
            receiver_id: alice.id,
            content: "Yes, after 2pm.".to_string(),
        },
    )
    .await?;

    let convo = message_service::get_conversation(&state, &principal(&alice), alice.id, bob.id)
        .await?
        .data
        .unwrap();
    assert_eq!(convo.items.len(), 2);
    assert_eq!(convo.items[0].content, "Are you free Tuesday?");
    assert_eq!(convo.items[1].content, "Yes, after 2pm.");

    // An outsider cannot read it.
    let spying =
        message_service::get_conversation(&state, &principal(&mallory), alice.id, bob.id).await;
    assert!(matches!(spying, Err(AppError::Forbidden)));

    // Only the receiver marks a message read.
    let wrong_side = message_service::mark_message_read(&state, &principal(&alice), sent.id).await;
    assert!(matches!(wrong_side, Err(AppError::Forbidden)));

    let read = message_service::mark_message_read(&state, &principal(&bob), sent.id)
        .await?
        .data
        .unwrap();
    assert!(read.is_read);
    Ok(())
}

#[tokio::test]
async fn nearby_search_returns_closest_first() -> anyhow::Result<()> {
    let state = setup_state();
    let center = GeoPoint {
        lat: 48.8566,
        lng: 2.3522,
    };

    register(&state, "walking-distance", Role::Assistant, Some(center)).await?;
    register(
        &state,
        "across-town",
        Role::Assistant,
        Some(GeoPoint {
            lat: 48.90,
            lng: 2.3522,
        }),
    )
    .await?;
    // Too far and wrong role respectively.
    register(
        &state,
        "in-lyon",
        Role::Assistant,
        Some(GeoPoint {
            lat: 45.76,
            lng: 4.84,
        }),
    )
    .await?;
    register(&state, "not-an-assistant", Role::Client, Some(center)).await?;

    let resp = user_service::nearby_assistants(
        &state,
        NearbyQuery {
            lat: center.lat,
            lng: center.lng,
            radius: None,
        },
    )
    .await?
    .data
    .unwrap();

    let names: Vec<&str> = resp
        .items
        .iter()
        .map(|n| n.user.username.as_str())
        .collect();
    assert_eq!(names, vec!["walking-distance", "across-town"]);
    assert!(resp.items[0].distance_km <= resp.items[1].distance_km);

    let bad = user_service::nearby_assistants(
        &state,
        NearbyQuery {
            lat: 123.0,
            lng: 0.0,
            radius: None,
        },
    )
    .await;
    assert!(matches!(bad, Err(AppError::BadRequest(_))));
    Ok(())
}
