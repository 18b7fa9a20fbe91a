use crate::{
    dto::services::{CreateServiceRequest, ServiceList, ServiceListQuery, UpdateServiceRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Role, Service},
    policy::ensure_self_or_admin,
    response::{ApiResponse, Meta},
    state::AppState,
    store::{NewService, ServicePatch},
};

pub async fn list_services(
    state: &AppState,
    query: ServiceListQuery,
) -> AppResult<ApiResponse<ServiceList>> {
    let mut items = match (query.category_id, query.assistant_id) {
        (Some(category_id), _) => state.store.list_services_by_category(category_id).await?,
        (None, Some(assistant_id)) => state.store.list_services_by_assistant(assistant_id).await?,
        (None, None) => state.store.list_services().await?,
    };
    if let Some(assistant_id) = query.assistant_id {
        items.retain(|s| s.assistant_id == assistant_id);
    }
    let meta = Meta::with_total(items.len() as i64);
    Ok(ApiResponse::success(
        "Services",
        ServiceList { items },
        Some(meta),
    ))
}

pub async fn get_service(state: &AppState, id: i64) -> AppResult<ApiResponse<Service>> {
    let service = state
        .store
        .get_service(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Service", service, None))
}

pub async fn create_service(
    state: &AppState,
    user: &AuthUser,
    payload: CreateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    if user.role != Role::Assistant && user.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    let assistant_id = payload.assistant_id.unwrap_or(user.user_id);
    if user.role != Role::Admin && assistant_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    if !(payload.hourly_rate.is_finite() && payload.hourly_rate > 0.0) {
        return Err(AppError::BadRequest(
            "Hourly rate must be positive".to_string(),
        ));
    }

    let assistant = state
        .store
        .get_user(assistant_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if assistant.role != Role::Assistant {
        return Err(AppError::BadRequest(
            "User is not an assistant".to_string(),
        ));
    }
    if state
        .store
        .get_category(payload.category_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound);
    }

    let service = state
        .store
        .create_service(NewService {
            assistant_id,
            category_id: payload.category_id,
            hourly_rate: payload.hourly_rate,
            description: payload.description,
        })
        .await?;

    tracing::info!(service_id = service.id, assistant_id, "service created");
    Ok(ApiResponse::success(
        "Service created",
        service,
        Some(Meta::empty()),
    ))
}

pub async fn update_service(
    state: &AppState,
    user: &AuthUser,
    id: i64,
    payload: UpdateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    let existing = state
        .store
        .get_service(id)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_self_or_admin(user, existing.assistant_id)?;

    if let Some(rate) = payload.hourly_rate {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(AppError::BadRequest(
                "Hourly rate must be positive".to_string(),
            ));
        }
    }
    if let Some(category_id) = payload.category_id {
        if state.store.get_category(category_id).await?.is_none() {
            return Err(AppError::NotFound);
        }
    }

    let patch = ServicePatch {
        category_id: payload.category_id,
        hourly_rate: payload.hourly_rate,
        description: payload.description,
    };
    let service = state
        .store
        .update_service(id, patch)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Updated", service, Some(Meta::empty())))
}

pub async fn delete_service(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = state
        .store
        .get_service(id)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_self_or_admin(user, existing.assistant_id)?;

    let removed = state.store.delete_service(id).await?;
    if !removed {
        return Err(AppError::NotFound);
    }
    tracing::info!(service_id = id, "service deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
