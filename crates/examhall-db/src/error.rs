use examhall_core::AppError;
use examhall_core::permissions::PermissionError;
use thiserror::Error;

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("account {0} does not exist")]
    UnknownAccount(String),

    /// A stored row names a role, module or flag this build does not know.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for PermissionError {
    fn from(err: StoreError) -> Self {
        PermissionError::Store(anyhow::Error::new(err))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => AppError::conflict(err),
            StoreError::UnknownAccount(_) => AppError::not_found(err),
            other => AppError::internal(other),
        }
    }
}
