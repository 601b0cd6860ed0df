//! Domain error kinds shared by every layer.
//!
//! Business-rule failures are returned as values of this type; the API layer
//! maps each variant to an HTTP status. Persistence failures are not modelled
//! here -- they travel as `sqlx::Error` and surface as an opaque 500.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A lead, campaign, user or feedback row does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed a boundary check (dates, budget, platforms, counters).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request is well-formed but breaks a business rule
    /// (duplicate feedback, deleting a campaign that owns leads, ...).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Role or ownership check failed.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound { entity, id }
    }
}
