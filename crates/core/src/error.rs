use crate::types::StudentId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: StudentId },

    #[error("Validation failed: {0}")]
    Validation(String),
}
