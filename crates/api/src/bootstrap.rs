//! First-start provisioning.

use leadflow_core::roles::{Role, UserStatus};
use leadflow_db::models::user::CreateUser;
use leadflow_db::repositories::UserRepo;
use leadflow_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured admin account when no admin exists yet.
///
/// Returns `true` if an account was created. A no-op once any admin exists,
/// so it is safe to run on every start.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if UserRepo::admin_exists(pool).await? {
        return Ok(false);
    }

    validate_password_strength(&admin.password).map_err(AppError::BadRequest)?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: admin.name.clone(),
            email: admin.email.clone(),
            password_hash,
            role: Role::Admin,
            status: Some(UserStatus::Active),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(true)
}
