#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("draft store request failed: {0}")]
    StoreRequest(reqwest::Error),
    #[error("draft store returned {status}: {body}")]
    StoreStatus { status: u16, body: String },
    #[error("failed to decode draft store response: {0}")]
    StoreResponse(reqwest::Error),
    #[error("draft store returned a malformed draft: {0}")]
    StoreData(String),
    #[error("failed to deserialize draft document: {0}")]
    Deserialization(serde_json::Error),
}

impl DraftError {
    /// True when the error was raised by the draft store rather than by local input.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            DraftError::StoreRequest(_)
                | DraftError::StoreStatus { .. }
                | DraftError::StoreResponse(_)
                | DraftError::StoreData(_)
        )
    }
}

pub type DraftResult<T> = std::result::Result<T, DraftError>;
