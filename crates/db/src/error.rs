use tiendas_core::error::CoreError;

/// Error returned by repository operations that enforce a domain rule
/// inside their transaction (quota checks, stock reservation, ...).
///
/// Plain CRUD methods return `sqlx::Error` directly.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
