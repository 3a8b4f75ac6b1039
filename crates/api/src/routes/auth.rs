//! Authentication routes: registration, login, token refresh, and
//! current-user info.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::{get, post}};
use serde_json::json;
use tracing::{error, info};

use super::{app_error, internal_error, json_error};
use crate::{AppState, middleware::AuthUser};
use khata_core::auth::{PasswordError, hash_password, verify_password};
use khata_db::repositories::user::{RegisterUserInput, UserError, UserRepository};
use khata_shared::AppError;
use khata_shared::auth::{LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, UserInfo};
use khata_shared::types::{UserId, WorkspaceId};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// Creates the auth routes that require authentication.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

/// POST /auth/register - Create a workspace and its admin user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e @ PasswordError::TooShort) => {
            return app_error(&AppError::Validation(e.to_string()));
        }
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            return internal_error();
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let (workspace, user) = match user_repo
        .register(RegisterUserInput {
            name: payload.name,
            email: payload.email,
            password_hash,
            workspace_name: payload.workspace_name,
        })
        .await
    {
        Ok(created) => created,
        Err(UserError::EmailTaken(email)) => {
            return app_error(&AppError::Conflict(format!(
                "Email already registered: {email}"
            )));
        }
        Err(e) => {
            error!(error = %e, "Registration failed");
            return internal_error();
        }
    };

    info!(user_id = %user.id, workspace_id = %workspace.id, "User registered");

    match token_response(&state, &user) {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(response) => response,
    }
}

/// POST /auth/login - Authenticate a user and return a token pair.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return json_error(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password",
            );
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return json_error(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password",
            );
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    info!(user_id = %user.id, "User logged in");

    match token_response(&state, &user) {
        Ok(response) => Json(response).into_response(),
        Err(response) => response,
    }
}

/// POST /auth/refresh - Exchange a refresh token for a fresh pair.
///
/// The user row is reloaded so a rotated role (or a deleted account) takes
/// effect at the next exchange rather than living on in old claims.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    let claims = match state.jwt_service.verify_refresh(&payload.refresh_token) {
        Ok(claims) => claims,
        Err(khata_shared::JwtError::Expired) => {
            return json_error(
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
                "Refresh token has expired",
            );
        }
        Err(_) => {
            return json_error(
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid refresh token",
            );
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let user = match user_repo.find_by_id(claims.user_id()).await {
        Ok(user) => user,
        Err(UserError::NotFound) => {
            return app_error(&AppError::Unauthorized(
                "refresh token no longer matches a user".to_string(),
            ));
        }
        Err(e) => {
            error!(error = %e, "Database error during token refresh");
            return internal_error();
        }
    };

    info!(user_id = %user.id, "Token pair refreshed");

    match token_response(&state, &user) {
        Ok(response) => Json(response).into_response(),
        Err(response) => response,
    }
}

/// GET /auth/me - Current user info.
async fn me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.find_by_id(auth.user_id()).await {
        Ok(user) => Json(json!({
            "id": user.id,
            "workspace_id": user.workspace_id,
            "name": user.name,
            "email": user.email,
            "role": user.role,
            "created_at": user.created_at,
        }))
        .into_response(),
        Err(UserError::NotFound) => app_error(&AppError::NotFound {
            resource: "User".to_string(),
        }),
        Err(e) => {
            error!(error = %e, "Failed to load current user");
            internal_error()
        }
    }
}

/// Issues the token pair for a user and assembles the login response.
fn token_response(
    state: &AppState,
    user: &khata_db::entities::users::Model,
) -> Result<LoginResponse, axum::response::Response> {
    let pair = state
        .jwt_service
        .issue_pair(
            UserId::from_uuid(user.id),
            WorkspaceId::from_uuid(user.workspace_id),
            &user.role,
        )
        .map_err(|e| {
            error!(error = %e, "Failed to issue token pair");
            internal_error()
        })?;

    Ok(LoginResponse {
        user: UserInfo {
            id: user.id,
            workspace_id: user.workspace_id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        },
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_in: pair.expires_in,
    })
}
