use thiserror::Error;

pub type GenResult<T> = Result<T, GenerateError>;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("remote read failed: {0}")]
    RemoteRead(String),

    #[error("remote write failed: {0}")]
    RemoteWrite(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("generation cancelled")]
    Cancelled,

    #[error("validation error: {0}")]
    Validation(String),
}

impl GenerateError {
    /// Wrap the error with the name of the pipeline stage it surfaced in.
    pub fn in_stage(self, stage: &str) -> Self {
        match self {
            GenerateError::RemoteRead(msg) => {
                GenerateError::RemoteRead(format!("{stage}: {msg}"))
            }
            GenerateError::RemoteWrite(msg) => {
                GenerateError::RemoteWrite(format!("{stage}: {msg}"))
            }
            GenerateError::NotFound(msg) => GenerateError::NotFound(format!("{stage}: {msg}")),
            other => other,
        }
    }
}
