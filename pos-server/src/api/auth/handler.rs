//! Authentication Handlers
//!
//! Courier self-registration, login for both roles, and the current user.

use axum::{Json, extract::State};
use shared::models::{
    Courier, LoginRequest, LoginResponse, RegisterRequest, UserAccount, UserInfo, UserRole,
};
use shared::util::{new_id, now_millis};

use crate::auth::{CurrentUser, MIN_PASSWORD_LEN, hash_password, verify_password};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode, validate_payload};

/// POST /api/auth/register - create an unapproved courier and its login
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<UserInfo>> {
    validate_payload(&payload)?;
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort)
            .with_detail("min_length", MIN_PASSWORD_LEN));
    }

    let users = state.users();
    if users.find_by_username(&payload.username).await?.is_some() {
        return Err(AppError::new(ErrorCode::UsernameExists)
            .with_detail("username", payload.username));
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let now = now_millis();
    let user_id = new_id();
    let courier = Courier {
        id: new_id(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone_number: payload.phone_number,
        vehicle_type: payload.vehicle_type,
        vehicle_plate: payload.vehicle_plate,
        is_available: true,
        is_approved: false,
        user_id: Some(user_id.clone()),
        created_at: now,
    };
    let account = UserAccount {
        id: user_id,
        username: payload.username,
        password_hash,
        role: UserRole::Courier,
        is_approved: false,
        courier_id: Some(courier.id.clone()),
        created_at: now,
    };

    let couriers = state.couriers();
    couriers.insert(&courier).await?;
    if let Err(e) = users.insert(&account).await {
        // Lost a race on the username
        if let Err(cleanup) = couriers.delete(&courier.id).await {
            tracing::error!(courier_id = %courier.id, error = %cleanup, "Failed to remove orphaned courier");
        }
        return Err(e.into());
    }

    tracing::info!(
        user_id = %account.id,
        courier_id = %courier.id,
        username = %account.username,
        "Courier registered, awaiting approval"
    );
    Ok(Json(UserInfo::from(&account)))
}

/// POST /api/auth/login - issue a bearer token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let account = state.users().find_by_username(&req.username).await?;

    // Same error for unknown user and wrong password
    let account = match account {
        Some(account) => {
            let valid = verify_password(&req.password, &account.password_hash)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !valid {
                security_log!("WARN", "login_failed", username = %req.username, reason = "invalid_password");
                return Err(AppError::invalid_credentials());
            }
            account
        }
        None => {
            security_log!("WARN", "login_failed", username = %req.username, reason = "unknown_user");
            return Err(AppError::invalid_credentials());
        }
    };

    if account.role == UserRole::Courier {
        let courier_approved = match &account.courier_id {
            Some(id) => state
                .couriers()
                .find_by_id(id)
                .await?
                .is_some_and(|c| c.is_approved),
            None => false,
        };
        if !account.is_approved || !courier_approved {
            security_log!("WARN", "login_unapproved", username = %account.username);
            return Err(AppError::new(ErrorCode::AccountNotApproved));
        }
    }

    let access_token = state
        .jwt_service()
        .generate_token(&account)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    security_log!("INFO", "login_success", user_id = %account.id, username = %account.username, role = %account.role);

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: UserInfo::from(&account),
    }))
}

/// GET /api/auth/me - current account, re-read from the store
pub async fn me(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<UserInfo>> {
    let account = state
        .users()
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", user.id)))?;
    Ok(Json(UserInfo::from(&account)))
}
