//! Registry-specific error kinds, folded into `OrchestratorError`/`ApiError`
//! at the boundary (§7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("room not found")]
    RoomNotFound,
    #[error("could not allocate a unique room code")]
    CodeGenerationExhausted,
    #[error("name '{0}' already has a credential in this room")]
    NameTaken(String),
    #[error("invalid credential")]
    InvalidCredential,
    #[error(transparent)]
    Orchestrator(#[from] crate::engine::OrchestratorError),
}

/// Folds registry-specific errors into the command-layer taxonomy (§7) at
/// the boundary, same as the teacher folds `LatestSnapshotError` into
/// `ApiError` in `server::error`.
impl From<RegistryError> for crate::engine::OrchestratorError {
    fn from(err: RegistryError) -> Self {
        use crate::engine::OrchestratorError;
        match err {
            RegistryError::RoomNotFound => OrchestratorError::NotFound,
            RegistryError::CodeGenerationExhausted => OrchestratorError::Internal,
            RegistryError::NameTaken(name) => {
                OrchestratorError::Conflict(format!("name '{name}' already taken"))
            }
            RegistryError::InvalidCredential => OrchestratorError::Unauthenticated,
            RegistryError::Orchestrator(inner) => inner,
        }
    }
}
