use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid number for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// True for recoverable user-input errors, which the frontend reports
    /// as plain messages. Persistence errors are not validation errors.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::MissingField(_) | StoreError::InvalidNumber { .. }
        )
    }
}
