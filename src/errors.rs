use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Reasons the one-shot catalog load can fail. All of them end in the
/// terminal "load failed" view.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to fetch catalog: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("catalog request returned status {0}")]
    Status(u16),
    #[error("catalog is not a valid document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate topic id '{0}'")]
    DuplicateTopicId(String),
    #[error("duplicate item id '{0}'")]
    DuplicateItemId(String),
    #[error("catalog has no topics")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}
