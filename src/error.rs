pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown pipeline stage: {0:?}")]
    UnknownStage(String),

    #[error("Invalid stage transition: {from} -> {to}")]
    Transition {
        from: crate::models::stage::Stage,
        to: crate::models::stage::Stage,
    },

    #[error("Gateway error ({code}): {message}")]
    Gateway { code: u16, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// HTTP-status-like code carried by gateway failures, used by UI layers
    /// to decide between "sign in again" and a dismissable notification.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Gateway { code, .. } => Some(*code),
            Error::Unauthorized(_) => Some(401),
            Error::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Validation failures are rejected at the component boundary and must
    /// never produce a network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::UnknownStage(_) | Error::Transition { .. } | Error::Validation(_)
        )
    }
}
