//! Authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::ErrorCode;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Routes reachable without a token
const PUBLIC_API_ROUTES: &[&str] = &["/api/auth/login", "/api/auth/register"];

/// Validate the bearer token and inject [`CurrentUser`] into request
/// extensions.
///
/// Skipped for `OPTIONS`, paths outside `/api/` and the public auth routes.
///
/// | Failure | Status |
/// |---------|--------|
/// | no `Authorization` header | 401 NotAuthenticated |
/// | expired token | 401 TokenExpired |
/// | bad token | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || PUBLIC_API_ROUTES.contains(&path)
    {
        return Ok(next.run(req).await);
    }

    let user = authenticate(state.jwt_service(), req.headers(), req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

pub(crate) fn authenticate(
    jwt_service: &JwtService,
    headers: &http::HeaderMap,
    uri: &http::Uri,
) -> Result<CurrentUser, AppError> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = %uri);
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => Ok(CurrentUser::from(claims)),
        Err(e) => {
            security_log!("WARN", "auth_failed", error = %e, uri = %uri);
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Admin role gate
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req.current_user()?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = %user.id,
            username = %user.username,
            role = %user.role
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(next.run(req).await)
}

/// Approved courier gate
pub async fn require_courier(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req.current_user()?;
    if !user.is_courier() {
        security_log!(
            "WARN",
            "courier_required",
            user_id = %user.id,
            username = %user.username,
            role = %user.role
        );
        let code = if user.role == shared::models::UserRole::Courier {
            ErrorCode::AccountNotApproved
        } else {
            ErrorCode::CourierRequired
        };
        return Err(AppError::new(code));
    }
    Ok(next.run(req).await)
}

/// Access to the [`CurrentUser`] placed by [`require_auth`]
pub trait CurrentUserExt {
    /// 401 when the request was not authenticated
    fn current_user(&self) -> Result<&CurrentUser, AppError>;
}

impl CurrentUserExt for Request {
    fn current_user(&self) -> Result<&CurrentUser, AppError> {
        self.extensions()
            .get::<CurrentUser>()
            .ok_or_else(AppError::unauthorized)
    }
}
