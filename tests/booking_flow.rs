use std::sync::Arc;

use chrono::{Duration, Utc};

use assistant_marketplace_api::{
    dto::{
        auth::RegisterRequest,
        bookings::{CreateBookingRequest, UpdateBookingRequest},
        reviews::CreateReviewRequest,
        services::CreateServiceRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{BookingLocation, BookingStatus, Role, User},
    services::{auth_service, booking_service, review_service, service_service},
    state::AppState,
    store::{MemoryStore, Store as _},
};

fn setup_state() -> AppState {
    AppState::new(Arc::new(MemoryStore::new()))
}

fn register(username: &str, role: Role) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "correct horse battery".to_string(),
        full_name: username.to_string(),
        role: Some(role),
        languages: None,
        bio: None,
        location: None,
    }
}

fn principal(user: &User) -> AuthUser {
    AuthUser {
        user_id: user.id,
        role: user.role,
    }
}

// Integration flow: assistant lists a service at $20/hr -> client books two
// hours -> assistant completes -> client reviews 5 stars -> avg becomes 5.0.
#[tokio::test]
async fn book_complete_and_review_flow() -> anyhow::Result<()> {
    let state = setup_state();

    let client = auth_service::register_user(&state, register("alice", Role::Client))
        .await?
        .data
        .unwrap();
    let assistant = auth_service::register_user(&state, register("bob", Role::Assistant))
        .await?
        .data
        .unwrap();

    let auth_client = principal(&client);
    let auth_assistant = principal(&assistant);

    let service = service_service::create_service(
        &state,
        &auth_assistant,
        CreateServiceRequest {
            assistant_id: None,
            category_id: 1,
            hourly_rate: 20.0,
            description: Some("Airport pickups".to_string()),
        },
    )
    .await?
    .data
    .unwrap();

    let start = Utc::now() + Duration::days(1);
    let booking = booking_service::create_booking(
        &state,
        &auth_client,
        CreateBookingRequest {
            client_id: None,
            assistant_id: assistant.id,
            service_id: service.id,
            start_time: start,
            end_time: start + Duration::hours(2),
            location: BookingLocation {
                lat: 48.8566,
                lng: 2.3522,
                address: "CDG Terminal 2".to_string(),
            },
            notes: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_amount, 40.0);

    // A client cannot confirm their own booking.
    let denied = booking_service::update_booking(
        &state,
        &auth_client,
        booking.id,
        UpdateBookingRequest {
            status: Some(BookingStatus::Confirmed),
            notes: None,
        },
    )
    .await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    // The assistant completes it.
    let completed = booking_service::update_booking(
        &state,
        &auth_assistant,
        booking.id,
        UpdateBookingRequest {
            status: Some(BookingStatus::Completed),
            notes: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(completed.status, BookingStatus::Completed);

    let review = review_service::create_review(
        &state,
        &auth_client,
        CreateReviewRequest {
            booking_id: booking.id,
            client_id: None,
            assistant_id: assistant.id,
            rating: 5,
            comment: Some("Flawless".to_string()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(review.rating, 5);

    let rated = state.store.get_user(assistant.id).await?.expect("assistant");
    assert_eq!(rated.avg_rating, Some(5.0));
    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_rejected() -> anyhow::Result<()> {
    let state = setup_state();

    auth_service::register_user(&state, register("alice", Role::Client)).await?;

    let mut dup = register("ALICE", Role::Client);
    dup.email = "other@example.com".to_string();
    let err = auth_service::register_user(&state, dup).await;
    match err {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Username already taken"),
        other => panic!("expected bad request, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected() -> anyhow::Result<()> {
    let state = setup_state();

    auth_service::register_user(&state, register("alice", Role::Client)).await?;

    let mut dup = register("alice2", Role::Client);
    dup.email = "ALICE@EXAMPLE.COM".to_string();
    let err = auth_service::register_user(&state, dup).await;
    match err {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Email already registered"),
        other => panic!("expected bad request, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn review_requires_completed_matching_booking() -> anyhow::Result<()> {
    let state = setup_state();

    let client = auth_service::register_user(&state, register("carol", Role::Client))
        .await?
        .data
        .unwrap();
    let assistant = auth_service::register_user(&state, register("dan", Role::Assistant))
        .await?
        .data
        .unwrap();
    let auth_client = principal(&client);
    let auth_assistant = principal(&assistant);

    let service = service_service::create_service(
        &state,
        &auth_assistant,
        CreateServiceRequest {
            assistant_id: None,
            category_id: 2,
            hourly_rate: 35.0,
            description: None,
        },
    )
    .await?
    .data
    .unwrap();

    let start = Utc::now();
    let booking = booking_service::create_booking(
        &state,
        &auth_client,
        CreateBookingRequest {
            client_id: None,
            assistant_id: assistant.id,
            service_id: service.id,
            start_time: start,
            end_time: start + Duration::hours(1),
            location: BookingLocation {
                lat: 0.0,
                lng: 0.0,
                address: "Downtown".to_string(),
            },
            notes: None,
        },
    )
    .await?
    .data
    .unwrap();

    // Still pending: no review yet.
    let premature = review_service::create_review(
        &state,
        &auth_client,
        CreateReviewRequest {
            booking_id: booking.id,
            client_id: None,
            assistant_id: assistant.id,
            rating: 4,
            comment: None,
        },
    )
    .await;
    assert!(matches!(premature, Err(AppError::BadRequest(_))));

    // Rating out of range.
    let out_of_range = review_service::create_review(
        &state,
        &auth_client,
        CreateReviewRequest {
            booking_id: booking.id,
            client_id: None,
            assistant_id: assistant.id,
            rating: 6,
            comment: None,
        },
    )
    .await;
    assert!(matches!(out_of_range, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn only_assistants_create_services_and_clients_only_cancel() -> anyhow::Result<()> {
    let state = setup_state();

    let client = auth_service::register_user(&state, register("eve", Role::Client))
        .await?
        .data
        .unwrap();
    let assistant = auth_service::register_user(&state, register("frank", Role::Assistant))
        .await?
        .data
        .unwrap();
    let auth_client = principal(&client);
    let auth_assistant = principal(&assistant);

    let denied = service_service::create_service(
        &state,
        &auth_client,
        CreateServiceRequest {
            assistant_id: None,
            category_id: 1,
            hourly_rate: 10.0,
            description: None,
        },
    )
    .await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    // An assistant cannot attribute a service to someone else.
    let misattributed = service_service::create_service(
        &state,
        &auth_assistant,
        CreateServiceRequest {
            assistant_id: Some(client.id),
            category_id: 1,
            hourly_rate: 10.0,
            description: None,
        },
    )
    .await;
    assert!(matches!(misattributed, Err(AppError::Forbidden)));

    let service = service_service::create_service(
        &state,
        &auth_assistant,
        CreateServiceRequest {
            assistant_id: None,
            category_id: 1,
            hourly_rate: 18.0,
            description: None,
        },
    )
    .await?
    .data
    .unwrap();

    let start = Utc::now();
    let booking = booking_service::create_booking(
        &state,
        &auth_client,
        CreateBookingRequest {
            client_id: None,
            assistant_id: assistant.id,
            service_id: service.id,
            start_time: start,
            end_time: start + Duration::hours(3),
            location: BookingLocation {
                lat: 51.5,
                lng: -0.12,
                address: "Hotel lobby".to_string(),
            },
            notes: Some("Bring a sign".to_string()),
        },
    )
    .await?
    .data
    .unwrap();

    let cancelled = booking_service::update_booking(
        &state,
        &auth_client,
        booking.id,
        UpdateBookingRequest {
            status: Some(BookingStatus::Cancelled),
            notes: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    Ok(())
}
