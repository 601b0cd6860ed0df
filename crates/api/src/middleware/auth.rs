//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use leadflow_core::access::ensure_active_account;
use leadflow_core::error::CoreError;
use leadflow_core::roles::{ActorContext, Role};
use leadflow_core::types::DbId;
use leadflow_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller, resolved from `Authorization: Bearer <token>` and the
/// account's current row.
///
/// Handlers that only need "logged in" take this (or [`RequireAuth`]) and
/// pass [`AuthUser::actor`] into the `leadflow_core::access` checks.
///
/// [`RequireAuth`]: super::rbac::RequireAuth
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
}

impl AuthUser {
    pub fn actor(&self) -> ActorContext {
        ActorContext::new(self.user_id, self.role)
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;
    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    /// Verifies the token, then loads the account so a deactivation or role
    /// change applies to tokens that were issued before it.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            unauthorized("Invalid or expired token")
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| unauthorized("Account no longer exists"))?;
        if let Err(err) = ensure_active_account(user.status) {
            tracing::debug!(user_id = user.id, status = %user.status, "Token for non-active account");
            return Err(err.into());
        }

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
        })
    }
}
