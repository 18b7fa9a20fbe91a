use crate::{
    dto::users::{NearbyAssistant, NearbyAssistantList, NearbyQuery, UpdateUserRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{GeoPoint, Role, User},
    policy::ensure_self_or_admin,
    response::{ApiResponse, Meta},
    services::auth_service::hash_password,
    state::AppState,
    store::UserPatch,
};

const DEFAULT_SEARCH_RADIUS_KM: f64 = 10.0;

pub async fn get_user(state: &AppState, id: i64) -> AppResult<ApiResponse<User>> {
    let user = state.store.get_user(id).await?.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("User", user, None))
}

pub async fn update_user(
    state: &AppState,
    user: &AuthUser,
    id: i64,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_self_or_admin(user, id)?;

    if payload.is_verified.is_some() && user.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    if let Some(email) = payload.email.as_deref() {
        if !email.contains('@') {
            return Err(AppError::BadRequest("A valid email is required".to_string()));
        }
        if let Some(other) = state.store.find_user_by_email(email).await? {
            if other.id != id {
                return Err(AppError::BadRequest("Email already registered".to_string()));
            }
        }
    }

    let password_hash = match payload.password.as_deref() {
        Some(p) if p.len() < 8 => {
            return Err(AppError::BadRequest(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        Some(p) => Some(hash_password(p)?),
        None => None,
    };

    let patch = UserPatch {
        email: payload.email,
        password_hash,
        full_name: payload.full_name,
        languages: payload.languages,
        bio: payload.bio,
        is_verified: payload.is_verified,
        location: payload.location,
    };

    let updated = state
        .store
        .update_user(id, patch)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(user_id = id, "profile updated");
    Ok(ApiResponse::success("Updated", updated, Some(Meta::empty())))
}

pub async fn nearby_assistants(
    state: &AppState,
    query: NearbyQuery,
) -> AppResult<ApiResponse<NearbyAssistantList>> {
    if !(-90.0..=90.0).contains(&query.lat) || !(-180.0..=180.0).contains(&query.lng) {
        return Err(AppError::BadRequest("Invalid coordinates".to_string()));
    }
    let radius = query.radius.unwrap_or(DEFAULT_SEARCH_RADIUS_KM);
    if !(radius.is_finite() && radius > 0.0) {
        return Err(AppError::BadRequest("Invalid radius".to_string()));
    }

    let center = GeoPoint {
        lat: query.lat,
        lng: query.lng,
    };
    let items = state
        .store
        .nearby_assistants(center, radius)
        .await?
        .into_iter()
        .map(|(user, distance_km)| NearbyAssistant { user, distance_km })
        .collect::<Vec<_>>();

    let meta = Meta::with_total(items.len() as i64);
    Ok(ApiResponse::success(
        "Nearby assistants",
        NearbyAssistantList { items },
        Some(meta),
    ))
}
