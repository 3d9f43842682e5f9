use thiserror::Error;

use crate::market::ListingKind;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing credential: {name}")]
    MissingCredential { name: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures talking to the marketplace search APIs.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("OAuth token request failed: {0}")]
    Token(String),

    #[error("{api} returned HTTP {status}: {body}")]
    Status {
        api: &'static str,
        status: u16,
        body: String,
    },

    #[error("malformed {api} response: {reason}")]
    MalformedResponse { api: &'static str, reason: &'static str },

    #[error("{api} cannot search {kind} listings")]
    Unsupported { api: &'static str, kind: ListingKind },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
