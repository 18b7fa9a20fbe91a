use crate::{
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::ServiceCategory,
    response::{ApiResponse, Meta},
    routes::categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
    state::AppState,
    store::{CategoryPatch, NewCategory},
};

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = state.store.list_categories().await?;
    let meta = Meta::with_total(items.len() as i64);
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(meta),
    ))
}

pub async fn get_category(state: &AppState, id: i64) -> AppResult<ApiResponse<ServiceCategory>> {
    let category = state
        .store
        .get_category(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Category", category, None))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<ServiceCategory>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Category name is required".to_string()));
    }
    if state
        .store
        .find_category_by_name(&payload.name)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "Category name already exists".to_string(),
        ));
    }

    let category = state
        .store
        .create_category(NewCategory {
            name: payload.name,
            icon: payload.icon,
            description: payload.description,
        })
        .await?;

    tracing::info!(category_id = category.id, "category created");
    Ok(ApiResponse::success(
        "Category created",
        category,
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: i64,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<ServiceCategory>> {
    ensure_admin(user)?;

    if let Some(name) = payload.name.as_deref() {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Category name is required".to_string()));
        }
        if let Some(other) = state.store.find_category_by_name(name).await? {
            if other.id != id {
                return Err(AppError::BadRequest(
                    "Category name already exists".to_string(),
                ));
            }
        }
    }

    let patch = CategoryPatch {
        name: payload.name,
        icon: payload.icon,
        description: payload.description,
    };
    let category = state
        .store
        .update_category(id, patch)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Updated",
        category,
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    // No cascade: existing services keep their category_id even when the
    // category goes away.
    let removed = state.store.delete_category(id).await?;
    if !removed {
        return Err(AppError::NotFound);
    }
    tracing::info!(category_id = id, "category deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
