use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;

use crate::{
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Role, User},
    response::{ApiResponse, Meta},
    state::AppState,
    store::{NewUser, UserPatch},
};

pub async fn register_user(state: &AppState, payload: RegisterRequest) -> AppResult<ApiResponse<User>> {
    if payload.username.trim().is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }
    if payload.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let role = payload.role.unwrap_or(Role::Client);
    if role == Role::Admin {
        return Err(AppError::BadRequest(
            "Cannot register an admin account".to_string(),
        ));
    }

    if state
        .store
        .find_user_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Username already taken".to_string()));
    }
    if state
        .store
        .find_user_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Email already registered".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;

    let user = state
        .store
        .create_user(NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
            full_name: payload.full_name,
            role,
            languages: payload.languages,
            bio: payload.bio,
            location: payload.location,
        })
        .await?;

    tracing::info!(user_id = user.id, role = ?user.role, "user registered");
    Ok(ApiResponse::success("User created", user, None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let user = state
        .store
        .find_user_by_username(&payload.username)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid username or password".to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest(
            "Invalid username or password".to_string(),
        ));
    }

    // Login counts as activity.
    let user = state
        .store
        .update_user(user.id, UserPatch::default())
        .await?
        .ok_or(AppError::NotFound)?;

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    tracing::info!(user_id = user.id, "user logged in");

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        user,
    };
    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub async fn current_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let record = state
        .store
        .get_user(user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Current user", record, None))
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}
