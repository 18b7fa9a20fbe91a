use std::sync::Arc;

use assistant_marketplace_api::{
    dto::{auth::RegisterRequest, services::CreateServiceRequest},
    error::AppError,
    middleware::auth::AuthUser,
    models::{Role, User},
    routes::categories::{CreateCategoryRequest, UpdateCategoryRequest},
    services::{auth_service, category_service, service_service},
    state::AppState,
    store::MemoryStore,
};

fn setup_state() -> AppState {
    AppState::new(Arc::new(MemoryStore::new()))
}

fn admin() -> AuthUser {
    AuthUser {
        user_id: 999,
        role: Role::Admin,
    }
}

async fn register(state: &AppState, username: &str, role: Role) -> anyhow::Result<User> {
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
            location: None,
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
async fn category_mutation_is_admin_only() -> anyhow::Result<()> {
    let state = setup_state();
    let client = register(&state, "alice", Role::Client).await?;
    let auth_client = principal(&client);

    let create = CreateCategoryRequest {
        name: "Gardening".to_string(),
        icon: "leaf".to_string(),
        description: None,
    };

    let denied = category_service::create_category(&state, &auth_client, create).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let denied = category_service::update_category(
        &state,
        &auth_client,
        1,
        UpdateCategoryRequest {
            name: Some("Hijacked".to_string()),
            icon: None,
            description: None,
        },
    )
    .await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let denied = category_service::delete_category(&state, &auth_client, 1).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    // Admin succeeds, and the list total reflects the addition.
    let created = category_service::create_category(
        &state,
        &admin(),
        CreateCategoryRequest {
            name: "Gardening".to_string(),
            icon: "leaf".to_string(),
            description: Some("Lawns and hedges".to_string()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(created.name, "Gardening");

    let listed = category_service::list_categories(&state).await?;
    let items = listed.data.unwrap().items;
    assert_eq!(items.len(), 7);
    assert_eq!(listed.meta.unwrap().total, Some(7));
    Ok(())
}

#[tokio::test]
async fn category_delete_leaves_services_dangling() -> anyhow::Result<()> {
    let state = setup_state();
    let assistant = register(&state, "bob", Role::Assistant).await?;
    let auth_assistant = principal(&assistant);

    let service = service_service::create_service(
        &state,
        &auth_assistant,
        CreateServiceRequest {
            assistant_id: None,
            category_id: 1,
            hourly_rate: 25.0,
            description: None,
        },
    )
    .await?
    .data
    .unwrap();

    category_service::delete_category(&state, &admin(), 1).await?;
    let gone = category_service::get_category(&state, 1).await;
    assert!(matches!(gone, Err(AppError::NotFound)));

    // No cascade: the service still points at the deleted category.
    let survivor = service_service::get_service(&state, service.id)
        .await?
        .data
        .unwrap();
    assert_eq!(survivor.category_id, 1);

    // Deleting again reports not found.
    let again = category_service::delete_category(&state, &admin(), 1).await;
    assert!(matches!(again, Err(AppError::NotFound)));
    Ok(())
}
