use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not replace storage file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("daily limit of {quota} readings reached")]
    QuotaExceeded { quota: u32 },
}
