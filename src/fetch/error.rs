use thiserror::Error;

/// Structured failure taxonomy for page fetching. The user-facing category
/// strings live in [`super::classify`]; this enum keeps the cause
/// machine-readable.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("{0}")]
    Other(String),

    #[error("gave up after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<FetchError>,
    },
}

impl FetchError {
    /// Strips the retry wrapper, yielding the underlying failure.
    pub fn root(&self) -> &FetchError {
        match self {
            FetchError::RetriesExhausted { source, .. } => source.root(),
            other => other,
        }
    }
}

/// reqwest hides TLS failures inside its source chain, so the full chain text
/// is needed both for the TLS-vs-connect split and for useful messages.
fn chain_text(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn mentions_tls(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl")
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout;
        }
        if let Some(status) = err.status() {
            return FetchError::Status(status.as_u16());
        }

        let detail = chain_text(&err);
        if err.is_connect() {
            if mentions_tls(&detail) {
                FetchError::Tls(detail)
            } else {
                FetchError::Connect(detail)
            }
        } else if err.is_builder() {
            FetchError::InvalidUrl(detail)
        } else if mentions_tls(&detail) {
            FetchError::Tls(detail)
        } else {
            FetchError::Request(detail)
        }
    }
}
