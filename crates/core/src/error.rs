//! Domain error type shared by every crate in the workspace.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The row does not exist, or exists outside the caller's visible set.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound { entity, id }
    }

    /// A referenced row (foreign key) that does not exist from the caller's
    /// point of view. Reported as a validation failure, not a 404.
    pub fn missing_reference(field: &str, id: DbId) -> Self {
        CoreError::Validation(format!("Invalid {field} \"{id}\": object does not exist"))
    }
}
