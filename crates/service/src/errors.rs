use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
    /// File content is not a JSON array.
    #[error("format error: {0}")]
    Format(#[from] serde_json::Error),
    #[error("not found: {0}")]
    NotFound(String),
}

impl StoreError {
    pub fn not_found(key: &str) -> Self { Self::NotFound(format!("no record with model {:?}", key)) }

    pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }
}
