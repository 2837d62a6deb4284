use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} is not set; set it or pass --input")]
    MissingConfig(&'static str),
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("artifact sink rejected {name}: {reason}")]
    Sink { name: String, reason: String },
}
