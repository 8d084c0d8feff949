use thiserror::Error;

/// Errors produced while turning provider data into listings
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON from {url}: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value for `{field}`: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("price `{0}` is neither an integer nor an integer range")]
    InvalidPrice(String),
}

/// Errors surfaced by the search client
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot encode `{dimension}` element {index}: expected a string, got {found}")]
    Encoding {
        dimension: String,
        index: usize,
        found: String,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("provider returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("filter file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("filter JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
