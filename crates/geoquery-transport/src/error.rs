use thiserror::Error;
pub type Result<T> = std::result::Result<T, TransportError>;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Either a search endpoint or a proxy url must be configured before searching")]
    MissingEndpoint,
    #[error("Invalid request url: {0}")]
    InvalidUrl(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Search backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
