/// Why a forecast fetch produced no payload.
///
/// Only the fetch collaborator produces these; missing fields inside a
/// successful payload are never errors.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("forecast API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse forecast JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no API key configured")]
    MissingApiKey,
}

pub type Result<T> = std::result::Result<T, FetchError>;

impl FetchError {
    pub fn status(status: u16, body: &str) -> Self {
        FetchError::Status {
            status,
            body: truncate_body(body),
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
