pub type ReelResult<T> = Result<T, ReelError>;

#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// The ffmpeg binary could not be found or spawned. Raised at renderer
    /// construction only; no render can ever succeed without the tool.
    #[error("environment error: {0}")]
    EnvironmentMissing(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    pub fn environment_missing(msg: impl Into<String>) -> Self {
        Self::EnvironmentMissing(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
