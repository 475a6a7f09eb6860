use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: reqwest::Method,
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("operation failed for {0}")]
    OperationFailed(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("unexpected response: {0}")]
    Mapping(#[from] serde_json::Error),

    #[error("can't derive an image name from {0}")]
    InvalidImageUrl(String),

    #[error("config error: {0}")]
    Config(String),
}

impl ApiError {
    /// Connection-level failures and 5xx answers; everything else is final.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
