use thiserror::Error;

/// Errors surfaced by the REST client, configuration and daemon connector.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Syncthing API error: {0}")]
    Syncthing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Syncthing API key not found")]
    MissingApiKey,
}
