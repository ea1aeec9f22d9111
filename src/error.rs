use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A label key has no translation. A mislabeled certificate is worse than
    /// no certificate, so this always aborts rendering.
    #[error("missing label translation: {0}")]
    MissingLabel(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("image error: {0}")]
    Image(String),

    #[error("font error: {0}")]
    Font(String),
}
